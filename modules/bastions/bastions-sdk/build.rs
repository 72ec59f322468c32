use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    // bastions-sdk -> bastions -> modules -> workspace root
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .ok_or("Could not find workspace root")?;

    let proto_dir = workspace_root.join("proto");
    let proto_file = proto_dir.join("arh/arh.proto");

    if !proto_file.exists() {
        return Err(format!(
            "Proto file not found: {} (workspace root: {})",
            proto_file.display(),
            workspace_root.display()
        )
        .into());
    }

    println!("cargo:rerun-if-changed={}", proto_file.display());
    println!("cargo:rerun-if-changed={}", proto_dir.display());

    tonic_prost_build::configure()
        .build_client(true)
        .build_server(true)
        .compile_protos(
            &[proto_file.to_str().ok_or("Invalid proto file path")?],
            &[proto_dir.to_str().ok_or("Invalid proto dir path")?],
        )?;

    Ok(())
}
