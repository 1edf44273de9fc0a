/// CHM6 Board Management CLI Library
///
/// This library provides the core functionality for the CHM6 board
/// management CLI: typed record construction for the board-domain managed
/// entities and a CRUD client facade over the management service's gRPC
/// surface.
///
/// # Modules
/// - `builder`: record construction for board configs, DCO states, and
///   TOM presence maps
/// - `client`: CRUD client facade over the gRPC transport
/// - `config`: configuration management
///
/// # Example
/// ```no_run
/// use chm6_board_cli::builder::{build_record, EntityKind, Operation};
/// use chm6_board_cli::client::CrudClient;
/// use chm6_board_cli::config::Settings;
///
/// async fn create_board() -> anyhow::Result<()> {
///     let settings = Settings::load("config/application.yml")?;
///     let record = build_record(EntityKind::Board, "42", Operation::Create)?;
///     let mut client = CrudClient::connect(&settings.grpc.client).await?;
///     let ack = client.create(record).await?;
///     println!("{:?}", ack);
///     Ok(())
/// }
/// ```

pub mod builder;
pub mod client;
pub mod config;

/// Generated protocol buffer code
pub mod proto {
    pub mod chm6 {
        pub mod board {
            pub mod v1 {
                tonic::include_proto!("chm6.board.v1");
            }
        }
    }
}
