use serde::{Deserialize, Serialize};
use underdb::adapters::{JsonFileSync, LocalStorage, MemorySync};
use underdb::{MemoryStorage, UnderDbSync};

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
struct Pantry {
    items: Vec<(String, u32)>,
}

fn main() -> Result<(), underdb::Error> {
    let path = std::env::temp_dir().join("underdb_example_basic.json");

    // file-backed
    let mut db = UnderDbSync::new(JsonFileSync::<Pantry>::new(&path));
    db.read()?;
    println!("on disk before = {:?}", db.data);

    let pantry = db.data.get_or_insert_with(Pantry::default);
    pantry.items.push(("apples".into(), 3));
    pantry.items.push(("bananas".into(), 5));
    db.write()?;
    println!("file contents:\n{}", std::fs::read_to_string(&path).unwrap_or_default());

    // unsaved edits are dropped by read()
    db.data = None;
    db.read()?;
    println!("after re-read = {:?}", db.data);

    // keyed storage
    let mut ls = UnderDbSync::new(LocalStorage::<Pantry, _>::new(MemoryStorage::new(), "pantry"));
    ls.data = db.data.clone();
    ls.write()?;
    println!("keyed store has {} key(s)", ls.adapter().store().len());

    // memory, for tests
    let mut mem = UnderDbSync::new(MemorySync::<Pantry>::new());
    mem.read()?;
    println!("memory starts as {:?}", mem.data);

    let _ = std::fs::remove_file(&path);
    Ok(())
}
