pub type LookbookResult<T> = Result<T, LookbookError>;

#[derive(thiserror::Error, Debug)]
pub enum LookbookError {
    #[error("filename parse error: {0}")]
    Parse(String),

    #[error("image decode error: {0}")]
    Decode(String),

    #[error("compose error: {0}")]
    Compose(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LookbookError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn compose(msg: impl Into<String>) -> Self {
        Self::Compose(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            LookbookError::parse("x")
                .to_string()
                .contains("filename parse error:")
        );
        assert!(
            LookbookError::decode("x")
                .to_string()
                .contains("image decode error:")
        );
        assert!(
            LookbookError::compose("x")
                .to_string()
                .contains("compose error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = LookbookError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
