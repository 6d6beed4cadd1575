use std::fmt::Display;

/// The two metals tracked, used to address providers and log fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metal {
    Gold,
    Silver,
}

impl Display for Metal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Metal::Gold => "gold",
                Metal::Silver => "silver",
            }
        )
    }
}
