use std::{collections::HashMap, sync::Arc};

use bastion_core::{ChallengeError, CodeProcessor, CodeType};

/// One processor per code type, resolved at request time.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<CodeType, Arc<dyn CodeProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `processor` for `code_type`, replacing and returning any
    /// previous one.
    pub fn register(
        &mut self,
        code_type: CodeType,
        processor: Arc<dyn CodeProcessor>,
    ) -> Option<Arc<dyn CodeProcessor>> {
        if processor.code_type() != code_type {
            tracing::warn!(
                %code_type,
                processor_type = %processor.code_type(),
                "Processor registered under a different code type"
            );
        }
        self.processors.insert(code_type, processor)
    }

    pub fn with(mut self, processor: Arc<dyn CodeProcessor>) -> Self {
        self.register(processor.code_type(), processor);
        self
    }

    pub fn resolve(&self, code_type: CodeType) -> Result<Arc<dyn CodeProcessor>, ChallengeError> {
        self.processors
            .get(&code_type)
            .cloned()
            .ok_or(ChallengeError::Unsupported(code_type))
    }

    pub fn code_types(&self) -> impl Iterator<Item = CodeType> + '_ {
        self.processors.keys().copied()
    }
}
