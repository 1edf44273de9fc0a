/// CRUD Client Facade Module
///
/// Wraps the management service's gRPC CRUD surface behind a small typed
/// facade. The facade owns an explicitly constructed transport: callers
/// connect, submit one record, and drop the client, which releases the
/// channel. There is no retry layer here; connect and request timeouts
/// come from the transport configuration.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use tracing::{debug, info};

use crate::builder::{ManagedRecord, Operation};
use crate::config::GrpcClientConfig;
use crate::proto::chm6::board::v1::crud_service_client::CrudServiceClient;
use crate::proto::chm6::board::v1::{CrudRequest, CrudResponse};

/// Error types for remote CRUD calls
#[derive(Debug, Error)]
pub enum RemoteCallError {
    #[error("invalid endpoint {uri}: {source}")]
    Endpoint {
        uri: String,
        source: tonic::transport::Error,
    },

    #[error("failed to connect to {uri}: {source}")]
    Connect {
        uri: String,
        source: tonic::transport::Error,
    },

    #[error("{operation} failed: {code}: {details}")]
    Call {
        operation: &'static str,
        code: Code,
        details: String,
    },
}

impl RemoteCallError {
    fn call(operation: &'static str, status: Status) -> Self {
        RemoteCallError::Call {
            operation,
            code: status.code(),
            details: status.message().to_string(),
        }
    }
}

/// One-shot request/response exchange with the CRUD service. The
/// generated tonic client is the production implementation; tests swap in
/// a mock.
#[async_trait]
pub trait CrudTransport: Send + Sync {
    async fn create(&mut self, request: CrudRequest) -> Result<CrudResponse, Status>;
    async fn update(&mut self, request: CrudRequest) -> Result<CrudResponse, Status>;
    async fn delete(&mut self, request: CrudRequest) -> Result<CrudResponse, Status>;
}

#[async_trait]
impl CrudTransport for CrudServiceClient<Channel> {
    async fn create(&mut self, request: CrudRequest) -> Result<CrudResponse, Status> {
        Ok(CrudServiceClient::create(self, request).await?.into_inner())
    }

    async fn update(&mut self, request: CrudRequest) -> Result<CrudResponse, Status> {
        Ok(CrudServiceClient::update(self, request).await?.into_inner())
    }

    async fn delete(&mut self, request: CrudRequest) -> Result<CrudResponse, Status> {
        Ok(CrudServiceClient::delete(self, request).await?.into_inner())
    }
}

/// Client facade for the management service's CRUD surface.
pub struct CrudClient {
    transport: Box<dyn CrudTransport>,
}

impl std::fmt::Debug for CrudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudClient").finish_non_exhaustive()
    }
}

impl CrudClient {
    /// Connects to the management service described by `config`.
    ///
    /// # Errors
    /// Returns `RemoteCallError::Endpoint` for a malformed endpoint URI
    /// and `RemoteCallError::Connect` if the service cannot be reached.
    pub async fn connect(config: &GrpcClientConfig) -> Result<Self, RemoteCallError> {
        let uri = config.uri();
        debug!("Connecting to management service at {}", uri);

        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|source| RemoteCallError::Endpoint {
                uri: uri.clone(),
                source,
            })?
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs));

        let channel = endpoint
            .connect()
            .await
            .map_err(|source| RemoteCallError::Connect { uri, source })?;

        Ok(Self::with_transport(Box::new(CrudServiceClient::new(
            channel,
        ))))
    }

    /// Builds a facade over an existing transport.
    pub fn with_transport(transport: Box<dyn CrudTransport>) -> Self {
        Self { transport }
    }

    /// Submits `record` with the rpc matching `operation`.
    pub async fn submit(
        &mut self,
        record: ManagedRecord,
        operation: Operation,
    ) -> Result<CrudResponse, RemoteCallError> {
        match operation {
            Operation::Create => self.create(record).await,
            Operation::Update => self.update(record).await,
            Operation::Delete => self.delete(record).await,
        }
    }

    /// Creates `record` on the management service.
    pub async fn create(&mut self, record: ManagedRecord) -> Result<CrudResponse, RemoteCallError> {
        let config_id = record.config_id().to_string();
        let response = self
            .transport
            .create(record.into())
            .await
            .map_err(|status| RemoteCallError::call("create", status))?;
        info!("Created {}: {:?}", config_id, response.status());
        Ok(response)
    }

    /// Updates `record` on the management service.
    pub async fn update(&mut self, record: ManagedRecord) -> Result<CrudResponse, RemoteCallError> {
        let config_id = record.config_id().to_string();
        let response = self
            .transport
            .update(record.into())
            .await
            .map_err(|status| RemoteCallError::call("update", status))?;
        info!("Updated {}: {:?}", config_id, response.status());
        Ok(response)
    }

    /// Deletes the entity identified by `record` from the management
    /// service.
    pub async fn delete(&mut self, record: ManagedRecord) -> Result<CrudResponse, RemoteCallError> {
        let config_id = record.config_id().to_string();
        let response = self
            .transport
            .delete(record.into())
            .await
            .map_err(|status| RemoteCallError::call("delete", status))?;
        info!("Deleted {}: {:?}", config_id, response.status());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_record, EntityKind};
    use crate::proto::chm6::board::v1::{crud_request, ResponseStatus};
    use mockall::mock;

    mock! {
        Transport {}

        #[async_trait]
        impl CrudTransport for Transport {
            async fn create(&mut self, request: CrudRequest) -> Result<CrudResponse, Status>;
            async fn update(&mut self, request: CrudRequest) -> Result<CrudResponse, Status>;
            async fn delete(&mut self, request: CrudRequest) -> Result<CrudResponse, Status>;
        }
    }

    fn request_config_id(request: &CrudRequest) -> String {
        match request.record.as_ref().unwrap() {
            crud_request::Record::BoardConfig(r) => {
                r.base_config.as_ref().unwrap().config_id.clone()
            }
            crud_request::Record::DcoState(r) => r.base_state.as_ref().unwrap().config_id.clone(),
            crud_request::Record::TomPresenceMap(r) => {
                r.base_state.as_ref().unwrap().config_id.clone()
            }
        }
    }

    #[tokio::test]
    async fn create_passes_acknowledgement_through() {
        let mut transport = MockTransport::new();
        transport.expect_create().once().returning(|request| {
            Ok(CrudResponse {
                config_id: request_config_id(&request),
                status: ResponseStatus::Accepted as i32,
                message: String::new(),
            })
        });

        let mut client = CrudClient::with_transport(Box::new(transport));
        let record = build_record(EntityKind::Board, "42", Operation::Create).unwrap();
        let ack = client.create(record).await.unwrap();
        assert_eq!(ack.config_id, "hostboard-42");
        assert_eq!(ack.status(), ResponseStatus::Accepted);
    }

    #[tokio::test]
    async fn status_surfaces_with_code_and_details() {
        let mut transport = MockTransport::new();
        transport
            .expect_update()
            .once()
            .returning(|_| Err(Status::unavailable("unavailable")));

        let mut client = CrudClient::with_transport(Box::new(transport));
        let record = build_record(EntityKind::Dco, "7", Operation::Update).unwrap();
        let err = client.update(record).await.unwrap_err();
        match err {
            RemoteCallError::Call {
                operation,
                code,
                details,
            } => {
                assert_eq!(operation, "update");
                assert_eq!(code, Code::Unavailable);
                assert!(details.contains("unavailable"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn submit_routes_delete_to_the_delete_rpc() {
        let mut transport = MockTransport::new();
        transport.expect_delete().once().returning(|request| {
            Ok(CrudResponse {
                config_id: request_config_id(&request),
                status: ResponseStatus::Accepted as i32,
                message: "deleted".to_string(),
            })
        });

        let mut client = CrudClient::with_transport(Box::new(transport));
        let record = build_record(EntityKind::Tom, "5", Operation::Delete).unwrap();
        let ack = client.submit(record, Operation::Delete).await.unwrap();
        assert_eq!(ack.config_id, "hostboard-5");
    }
}
