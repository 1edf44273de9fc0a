/// Build script: compiles the CRUD service schema into Rust.
///
/// Generates both the client (used by the facade) and the server (used by
/// the integration tests' in-process service). Generated types derive
/// `serde::Serialize` so the CLI can print acknowledgements as JSON.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use a vendored `protoc` when one is not already provided by the
    // environment, so the build does not depend on a system install.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(protoc) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", protoc);
        }
    }

    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .type_attribute(".chm6.board.v1", "#[derive(serde::Serialize)]")
        .compile_protos(
            &["proto/records.proto", "proto/crud_service.proto"],
            &["proto"],
        )?;
    Ok(())
}
