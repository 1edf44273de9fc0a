/// Record Builder Module
///
/// Constructs fully populated managed-entity records for submission to the
/// management service. Each build is pure apart from reading the clock:
/// the caller supplies an entity kind, an entity id, and the requested
/// operation, and receives a record whose `config_id` carries the fixed
/// per-entity prefix and whose `mark_for_delete` flag reflects the
/// operation. Entity payload fields are populated with the demonstration
/// values the management service expects from this tool.

use chrono::Local;
use thiserror::Error;

use crate::proto::chm6::board::v1::{
    crud_request, BaseRecord, BoardAction, BoardCommonConfig, BoardConfig, BoardConfigHal,
    CrudRequest, DcoCapabilities, DcoState, DcoStateHal, SupportedClient, SupportedLineMode,
    TomPresenceMap,
};

/// Managed entity kinds addressable through the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Host-board configuration
    Board,
    /// DCO transceiver state
    Dco,
    /// TOM presence bitmap of a host board
    Tom,
}

impl EntityKind {
    /// Fixed config_id prefix for this entity kind. The TOM presence map
    /// is keyed to its host board and shares the board prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            EntityKind::Board | EntityKind::Tom => "hostboard-",
            EntityKind::Dco => "dco-",
        }
    }
}

/// Requested mutation, determines `mark_for_delete` and which rpc the
/// facade will invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    fn mark_for_delete(self) -> bool {
        matches!(self, Operation::Delete)
    }
}

/// Error types for record construction
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("invalid entity id: {0:?}")]
    InvalidEntityId(String),
}

/// A built record, ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ManagedRecord {
    Board(BoardConfig),
    Dco(DcoState),
    Tom(TomPresenceMap),
}

impl ManagedRecord {
    /// The config_id the record will be stored under.
    pub fn config_id(&self) -> &str {
        match self {
            ManagedRecord::Board(r) => base_id(&r.base_config),
            ManagedRecord::Dco(r) => base_id(&r.base_state),
            ManagedRecord::Tom(r) => base_id(&r.base_state),
        }
    }

    /// Whether the record signals deletion intent.
    pub fn mark_for_delete(&self) -> bool {
        match self {
            ManagedRecord::Board(r) => base_mfd(&r.base_config),
            ManagedRecord::Dco(r) => base_mfd(&r.base_state),
            ManagedRecord::Tom(r) => base_mfd(&r.base_state),
        }
    }
}

fn base_id(base: &Option<BaseRecord>) -> &str {
    base.as_ref().map(|b| b.config_id.as_str()).unwrap_or("")
}

fn base_mfd(base: &Option<BaseRecord>) -> bool {
    base.as_ref().map(|b| b.mark_for_delete).unwrap_or(false)
}

impl From<ManagedRecord> for CrudRequest {
    fn from(record: ManagedRecord) -> Self {
        let record = match record {
            ManagedRecord::Board(r) => crud_request::Record::BoardConfig(r),
            ManagedRecord::Dco(r) => crud_request::Record::DcoState(r),
            ManagedRecord::Tom(r) => crud_request::Record::TomPresenceMap(r),
        };
        CrudRequest {
            record: Some(record),
        }
    }
}

/// Builds the record for one (entity, id, operation) triple.
///
/// # Errors
/// Returns `BuilderError::InvalidEntityId` if `entity_id` is empty or
/// blank. No other validation is performed; the management service owns
/// the schema-level checks.
pub fn build_record(
    kind: EntityKind,
    entity_id: &str,
    operation: Operation,
) -> Result<ManagedRecord, BuilderError> {
    if entity_id.trim().is_empty() {
        return Err(BuilderError::InvalidEntityId(entity_id.to_string()));
    }

    let base = base_record(kind, entity_id, operation);
    let record = match kind {
        EntityKind::Board => ManagedRecord::Board(board_config(base, operation)),
        EntityKind::Dco => ManagedRecord::Dco(dco_state(base, operation)),
        EntityKind::Tom => ManagedRecord::Tom(tom_presence_map(base, operation)),
    };
    Ok(record)
}

fn base_record(kind: EntityKind, entity_id: &str, operation: Operation) -> BaseRecord {
    BaseRecord {
        config_id: format!("{}{}", kind.prefix(), entity_id),
        mark_for_delete: operation.mark_for_delete(),
        timestamp: Local::now().format("%c").to_string(),
    }
}

fn board_config(base: BaseRecord, operation: Operation) -> BoardConfig {
    // A delete carries only the base record; the card actions would be
    // rejected on a record that is going away.
    let hal = match operation {
        Operation::Create | Operation::Update => Some(BoardConfigHal {
            common_config: Some(BoardCommonConfig {
                host_card_action: BoardAction::UpdateFw as i32,
            }),
            dco_card_action: BoardAction::InitHw as i32,
        }),
        Operation::Delete => None,
    };
    BoardConfig {
        base_config: Some(base),
        hal,
    }
}

fn dco_state(base: BaseRecord, operation: Operation) -> DcoState {
    let aid = base.config_id.clone();
    let hal = match operation {
        Operation::Create | Operation::Update => Some(DcoStateHal {
            dco_capabilities: Some(demo_dco_capabilities()),
        }),
        Operation::Delete => None,
    };
    DcoState {
        base_state: Some(base),
        aid,
        hal,
    }
}

fn demo_dco_capabilities() -> DcoCapabilities {
    DcoCapabilities {
        supported_clients: vec![
            SupportedClient {
                name: "client-2".to_string(),
                band_width: 2,
            },
            SupportedClient {
                name: "client-3".to_string(),
                band_width: 1,
            },
        ],
        supported_line_modes: vec![SupportedLineMode {
            application_code: "line_app_code_2".to_string(),
            client_mode: 3,
            capacity: 100,
            baud_rate: 20,
        }],
    }
}

fn tom_presence_map(base: BaseRecord, operation: Operation) -> TomPresenceMap {
    let aid = base.config_id.clone();
    // Cages 2 and 3 seated.
    let bitmap = match operation {
        Operation::Create | Operation::Update => 6,
        Operation::Delete => 0,
    };
    TomPresenceMap {
        base_state: Some(base),
        aid,
        tom_presence_map: bitmap,
    }
}
