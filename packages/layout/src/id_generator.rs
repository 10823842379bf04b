use uuid::Uuid;

/// Source of fresh component uuids and correlation ids
#[derive(Debug, Clone)]
pub enum IdGenerator {
    /// Random v4 UUIDs
    Random,
    /// `{seed}-{count}`, counting from 1
    Sequential { seed: String, count: u32 },
}

impl IdGenerator {
    pub fn random() -> Self {
        Self::Random
    }

    pub fn sequential(seed: impl Into<String>) -> Self {
        Self::Sequential {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate the next id
    pub fn new_id(&mut self) -> String {
        match self {
            Self::Random => Uuid::new_v4().to_string(),
            Self::Sequential { seed, count } => {
                *count += 1;
                format!("{}-{}", seed, count)
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}
