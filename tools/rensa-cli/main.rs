use clap::Parser;
use itertools::Itertools;
use rensa::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Resolve and compile the pipelines of an editor document, and optionally
/// execute them against a running processing service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the editor document JSON file (nodes + edges)
    document_path: String,

    /// Path to the image uploaded into the source node
    #[arg(short, long)]
    source: Option<String>,

    /// Base URL of the processing service (e.g. http://localhost:8000);
    /// if omitted, pipelines are compiled and printed but not executed
    #[arg(short, long)]
    engine: Option<String>,

    /// Output path for the processed artifact(s)
    #[arg(short, long, default_value = "processed.png")]
    out: PathBuf,
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Output path for the n-th sink: `processed.png`, `processed.1.png`, ...
fn out_path_for(base: &Path, index: usize) -> PathBuf {
    if index == 0 {
        return base.to_path_buf();
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
    let ext = base.extension().and_then(|e| e.to_str()).unwrap_or("png");
    base.with_file_name(format!("{}.{}.{}", stem, index, ext))
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Document loading and conversion ---
    let document_json = fs::read_to_string(&cli.document_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read document file '{}': {}",
            &cli.document_path, e
        ))
    });
    let document = UiDocument::from_json(&document_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse document: {}", e)));
    let import = document
        .into_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert document: {}", e)));
    let mut graph = import.graph;

    println!(
        "Loaded document: {} nodes, {} connections",
        graph.node_count(),
        graph.edge_count()
    );

    // --- 2. Source upload ---
    if let Some(source_path) = &cli.source {
        let path = Path::new(source_path);
        let bytes = fs::read(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read source image '{}': {}", source_path, e))
        });
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");
        let blob = ImageBlob::new(bytes, file_name, media_type_for(path));

        let sources: Vec<NodeId> = graph
            .nodes()
            .filter(|n| n.kind() == NodeKind::Source)
            .map(|n| n.id)
            .collect();
        let count = sources.len();
        for id in sources {
            graph
                .update_payload(id, PayloadPatch::SourceData(blob.clone()))
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to attach source: {}", e)));
        }
        println!("Attached '{}' to {} source node(s)", file_name, count);
    }

    let sinks = graph.sinks();
    if sinks.is_empty() {
        exit_with_error("Document contains no output node.");
    }

    // --- 3. Resolution and compilation ---
    println!("\nCompiling {} pipeline(s)...", sinks.len());
    let mut compiled = Vec::new();
    for &sink in &sinks {
        let chain = match resolve_path(&graph, sink) {
            Ok(chain) => chain,
            Err(e) => exit_with_error(&format!("Pipeline for sink '{}' not ready: {}", sink, e)),
        };
        match compile(&chain, sink) {
            Ok(pipeline) => {
                let plan = pipeline
                    .operations
                    .iter()
                    .map(|op| op.name.as_str())
                    .join(" -> ");
                println!(
                    "  -> sink '{}': {} operation(s): {}",
                    sink,
                    pipeline.operations.len(),
                    if plan.is_empty() { "(pass-through)" } else { plan.as_str() }
                );
                compiled.push(sink);
            }
            Err(CompileError::MissingSourceData { id }) => {
                println!(
                    "  -> sink '{}': source '{}' has no image loaded (pass --source)",
                    sink, id
                );
            }
            Err(e) => exit_with_error(&format!("Compilation failed for sink '{}': {}", sink, e)),
        }
    }

    // --- 4. Execution ---
    let Some(engine_url) = cli.engine else {
        println!("\nNo engine URL given; stopping after compilation.");
        return;
    };
    if compiled.is_empty() {
        exit_with_error("No pipeline is ready to execute.");
    }

    println!("\nExecuting against {}...", engine_url);
    let engine = Arc::new(HttpEngine::new(&engine_url));
    let session = EditorSession::with_graph(
        Arc::new(parking_lot::Mutex::new(graph)),
        engine,
    );

    for (index, &sink) in compiled.iter().enumerate() {
        let run_start = Instant::now();
        if let Err(e) = session.run(sink).await {
            exit_with_error(&format!("Run failed for sink '{}': {}", sink, e));
        }
        let artifact = session
            .result(sink)
            .unwrap_or_else(|| exit_with_error("Engine reported success but no result was stored"));
        let out = out_path_for(&cli.out, index);
        fs::write(&out, &artifact.bytes)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", out.display(), e)));
        println!(
            "  -> sink '{}': {} bytes ({}) written to '{}' in {:?}",
            sink,
            artifact.bytes.len(),
            artifact.media_type,
            out.display(),
            run_start.elapsed()
        );
    }

    println!("\nDone in {:?}", total_start.elapsed());
}
