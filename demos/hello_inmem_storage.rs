use inmem_storage::{DurableStorage, FileStorage, InMemStorage, ManualLifecycle, PageEvent};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Prints data from store to the screen in a pretty way
macro_rules! pprint_data {
    ($title:expr, $data:expr) => {
        println!("\n");
        println!("{}", $title);
        println!("===============");

        for (k, got) in $data {
            let got_str = match got {
                None => "None".to_string(),
                Some(v) => v.to_string(),
            };
            println!("For key: '{}', value: {}", k, got_str);
        }
    };
}

fn main() {
    // Set RUST_LOG=debug to see every backup and restore
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Outside a browser, the backup goes into a folder, one file per key.
    // In a browser, use `WebLocalStorage` and `BrowserLifecycle` (feature "web").
    let durable = FileStorage::new("inmem_storage_demo").expect("create file storage");
    let lifecycle = Rc::new(ManualLifecycle::new());
    let store = InMemStorage::new(durable, lifecycle.clone(), None);
    store.initialize().expect("initialize store");

    let records = [
        ("hey", "English"),
        ("hi", "English"),
        ("salut", "French"),
        ("bonjour", "French"),
        ("hola", "Spanish"),
        ("oi", "Portuguese"),
        ("mulimuta", "Runyoro"),
    ];
    let keys: Vec<&str> = records.iter().map(|(k, _)| *k).collect();

    // Setting the values
    println!("Let's insert data\n{:?}]...", &records);
    for (k, v) in &records {
        let _ = store.set_item(*k, *v);
    }

    let data = get_all(&store, &keys);
    pprint_data!("After inserting data", &data);

    // Keys have to be strings
    println!("\n\nLet's try a number as a key...");
    if let Err(e) = store.set_item(123455, "cause an error") {
        println!("Refused: {}", e);
    }

    // Hiding the page backs the store up
    println!("\n\nThe page gets hidden...");
    lifecycle.emit(PageEvent::Hidden);
    let backup = FileStorage::new("inmem_storage_demo")
        .expect("open file storage")
        .read(&store.backup_key());
    println!("Backup on disk: {:?}", backup);

    // Showing it again restores the store and erases the backup
    println!("\n\nThe page is visible again...");
    lifecycle.emit(PageEvent::Visible);
    let backup = FileStorage::new("inmem_storage_demo")
        .expect("open file storage")
        .read(&store.backup_key());
    println!("Backup on disk: {:?}", backup);

    // Deleting some values
    let keys_to_delete = ["oi", "hi"];
    println!("\n\nLet's delete keys{:?}]...", &keys_to_delete);
    for k in keys_to_delete {
        store.remove_item(k);
    }

    let data = get_all(&store, &keys);
    pprint_data!("After deleting keys", &data);

    // Logging out: clear all data and never back up again
    println!("\n\nClear all data...");
    store.clear();
    lifecycle.emit(PageEvent::Unload);

    let data = get_all(&store, &keys);
    pprint_data!("After clearing", &data);
    println!("Size: {}", store.size());

    std::fs::remove_dir_all("inmem_storage_demo").unwrap_or(());
}

/// Gets all from store for the given keys
fn get_all<'a>(
    store: &InMemStorage,
    keys: &[&'a str],
) -> Vec<(&'a str, Option<serde_json::Value>)> {
    keys.iter().map(|k| (*k, store.get_item(k))).collect()
}
