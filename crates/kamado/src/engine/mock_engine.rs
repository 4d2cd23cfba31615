use crate::engine::{InferenceEngine, InferenceModule};
use crate::error::InferenceError;

/// Magic prefix a well-formed mock module must start with
pub(crate) const MOCK_MAGIC: &[u8] = b"KMDMOCK1";

/// Builds valid mock module bytes carrying the given bias parameter.
pub(crate) fn mock_module_bytes(bias: u8) -> Vec<u8> {
    let mut bytes = MOCK_MAGIC.to_vec();
    bytes.push(bias);
    bytes
}

// A simple mock module implementation for testing
pub(crate) struct MockModule {
    bias: i64,
}

pub(crate) struct MockEngine {
    bias: i64,
}

impl InferenceModule for MockModule {
    type Engine = MockEngine;

    fn load(bytes: &[u8]) -> Result<Self, InferenceError> {
        if !bytes.starts_with(MOCK_MAGIC) {
            return Err(InferenceError::ModuleLoad(
                "bad magic, not a mock module".to_string(),
            ));
        }
        let bias = bytes.get(MOCK_MAGIC.len()).copied().unwrap_or(0) as i64;
        Ok(Self { bias })
    }

    fn construct(&self) -> Result<Self::Engine, InferenceError> {
        Ok(MockEngine { bias: self.bias })
    }
}

impl InferenceEngine for MockEngine {
    type Input = Vec<i64>;
    type Output = i64;

    // Sums the features plus the module's bias. An empty vector is rejected
    // as invalid input, and i64::MIN anywhere triggers an internal fault,
    // giving tests one handle on each error kind.
    fn execute(&mut self, input: Self::Input) -> Result<Self::Output, InferenceError> {
        if input.is_empty() {
            return Err(InferenceError::InvalidInput(
                "empty feature vector".to_string(),
            ));
        }
        if input.contains(&i64::MIN) {
            return Err(InferenceError::Execution(
                "accumulator overflow".to_string(),
            ));
        }
        Ok(input.iter().sum::<i64>() + self.bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rejects_bad_magic() {
        match MockModule::load(b"garbage") {
            Err(InferenceError::ModuleLoad(_)) => {}
            other => panic!("expected ModuleLoad error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_construct_is_repeatable() {
        let module = MockModule::load(&mock_module_bytes(3)).unwrap();

        let mut first = module.construct().unwrap();
        let mut second = module.construct().unwrap();
        assert_eq!(first.execute(vec![1]).unwrap(), 4);
        assert_eq!(second.execute(vec![1]).unwrap(), 4);
    }

    #[test]
    fn test_execute_is_deterministic() {
        let module = MockModule::load(&mock_module_bytes(0)).unwrap();
        let mut engine = module.construct().unwrap();

        let first = engine.execute(vec![5, 6, 7]).unwrap();
        let second = engine.execute(vec![5, 6, 7]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_error_kinds() {
        let module = MockModule::load(&mock_module_bytes(0)).unwrap();
        let mut engine = module.construct().unwrap();

        assert!(matches!(
            engine.execute(vec![]),
            Err(InferenceError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.execute(vec![i64::MIN]),
            Err(InferenceError::Execution(_))
        ));

        // A failed invocation never corrupts later ones
        assert_eq!(engine.execute(vec![2, 3]).unwrap(), 5);
    }
}
