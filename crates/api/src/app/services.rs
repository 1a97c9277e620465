use std::sync::Arc;

use foodtrace_infra::{CommandDispatcher, InMemoryEntityStore, LedgerConfig};

pub type Dispatcher = CommandDispatcher<Arc<InMemoryEntityStore>>;

/// Shared state behind every handler.
#[derive(Debug)]
pub struct AppServices {
    pub dispatcher: Dispatcher,
}

pub fn build_services(config: LedgerConfig) -> AppServices {
    let store = Arc::new(InMemoryEntityStore::new());
    tracing::info!(
        max_argument_len = config.max_argument_len,
        version = %config.chaincode_version,
        "ledger services ready"
    );
    AppServices {
        dispatcher: CommandDispatcher::new(store, config),
    }
}
