//! In-process CRUD services for integration tests.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

use chm6_board_cli::proto::chm6::board::v1::crud_service_server::{CrudService, CrudServiceServer};
use chm6_board_cli::proto::chm6::board::v1::{crud_request, CrudRequest, CrudResponse, ResponseStatus};

fn config_id_of(request: &CrudRequest) -> String {
    match request.record.as_ref() {
        Some(crud_request::Record::BoardConfig(r)) => r
            .base_config
            .as_ref()
            .map(|b| b.config_id.clone())
            .unwrap_or_default(),
        Some(crud_request::Record::DcoState(r)) => r
            .base_state
            .as_ref()
            .map(|b| b.config_id.clone())
            .unwrap_or_default(),
        Some(crud_request::Record::TomPresenceMap(r)) => r
            .base_state
            .as_ref()
            .map(|b| b.config_id.clone())
            .unwrap_or_default(),
        None => String::new(),
    }
}

fn ack(request: Request<CrudRequest>, verb: &str) -> Result<Response<CrudResponse>, Status> {
    let request = request.into_inner();
    Ok(Response::new(CrudResponse {
        config_id: config_id_of(&request),
        status: ResponseStatus::Accepted as i32,
        message: verb.to_string(),
    }))
}

/// Accepts every mutation and echoes the submitted config_id back.
#[derive(Default)]
pub struct EchoCrudService;

#[tonic::async_trait]
impl CrudService for EchoCrudService {
    async fn create(
        &self,
        request: Request<CrudRequest>,
    ) -> Result<Response<CrudResponse>, Status> {
        ack(request, "created")
    }

    async fn update(
        &self,
        request: Request<CrudRequest>,
    ) -> Result<Response<CrudResponse>, Status> {
        ack(request, "updated")
    }

    async fn delete(
        &self,
        request: Request<CrudRequest>,
    ) -> Result<Response<CrudResponse>, Status> {
        ack(request, "deleted")
    }
}

/// Fails every mutation with `unavailable`.
#[derive(Default)]
pub struct UnavailableCrudService;

#[tonic::async_trait]
impl CrudService for UnavailableCrudService {
    async fn create(&self, _: Request<CrudRequest>) -> Result<Response<CrudResponse>, Status> {
        Err(Status::unavailable("unavailable"))
    }

    async fn update(&self, _: Request<CrudRequest>) -> Result<Response<CrudResponse>, Status> {
        Err(Status::unavailable("unavailable"))
    }

    async fn delete(&self, _: Request<CrudRequest>) -> Result<Response<CrudResponse>, Status> {
        Err(Status::unavailable("unavailable"))
    }
}

/// Serves the echo service on an ephemeral local port.
pub async fn spawn_echo() -> SocketAddr {
    serve(CrudServiceServer::new(EchoCrudService)).await
}

/// Serves the always-unavailable service on an ephemeral local port.
pub async fn spawn_unavailable() -> SocketAddr {
    serve(CrudServiceServer::new(UnavailableCrudService)).await
}

async fn serve<S>(service: CrudServiceServer<S>) -> SocketAddr
where
    S: CrudService,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .expect("test server");
    });
    addr
}
