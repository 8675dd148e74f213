use crate::error::AuthError;

/// Gate in front of the tutor dashboard: a shared secret compared for
/// exact equality.
#[derive(Debug, Clone)]
pub struct TutorGate {
    secret: String,
}

impl TutorGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn verify(&self, attempt: &str) -> Result<(), AuthError> {
        if attempt == self.secret {
            Ok(())
        } else {
            Err(AuthError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let gate = TutorGate::new("Secret");
        assert!(gate.verify("Secret").is_ok());
        assert_eq!(gate.verify("secret"), Err(AuthError));
        assert_eq!(gate.verify(" Secret"), Err(AuthError));
        assert_eq!(gate.verify(""), Err(AuthError));
    }
}
