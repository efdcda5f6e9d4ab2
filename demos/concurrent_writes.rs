use futures::future::join_all;
use underdb::adapters::JsonFile;
use underdb::{Adapter, UnderDb};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), underdb::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::temp_dir().join("underdb_example_concurrent.json");
    let file = JsonFile::<u32>::new(&path);

    // All 101 writes are queued before any runs; they still land in call order.
    let values: Vec<u32> = (0..=100).collect();
    let writes: Vec<_> = values.iter().map(|v| file.write(Some(v))).collect();
    for res in join_all(writes).await {
        res?;
    }

    let mut db = UnderDb::new(file);
    db.read().await?;
    println!("final value = {:?}", db.data);

    let _ = std::fs::remove_file(&path);
    Ok(())
}
