/// Password gate in front of the upload action.
///
/// The secret is compared as plain text, the same way it is configured. This is
/// a shared-password check only; it does not identify users.
#[derive(Clone)]
pub struct AdminGate {
    secret: String,
}

/// Permission for exactly one upload. Not `Clone`: each correct password
/// submission grants one permit, and uploading consumes it.
#[derive(Debug)]
pub struct UploadPermit {
    _private: (),
}

#[derive(Debug)]
pub enum GateDecision {
    Granted(UploadPermit),
    Denied,
    /// Nothing was submitted; neither an error nor a permit.
    Idle,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn check(&self, submitted: &str) -> GateDecision {
        if submitted.is_empty() {
            return GateDecision::Idle;
        }

        if constant_time_eq(submitted.as_bytes(), self.secret.as_bytes()) {
            GateDecision::Granted(UploadPermit { _private: () })
        } else {
            GateDecision::Denied
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
