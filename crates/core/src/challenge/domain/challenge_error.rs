use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChallengeError {
    #[error("invalid challenge configuration: {0}")]
    InvalidConfig(String),
    #[error("detector returned {available} landmarks, landmark index {index} is out of range")]
    MissingLandmark { index: usize, available: usize },
}
