//! Index a small directory listing, then browse and prune it by prefix.
//!
//! Run with `RUST_LOG=radix2=trace` to see node splits and merges.

use radix2::{SharedTree, Tree};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let listing = [
        ("/", 4096u64),
        ("/etc/hosts", 220),
        ("/etc/passwd", 1830),
        ("/home/ana/notes.txt", 912),
        ("/home/ana/src/main.rs", 2048),
        ("/home/ana/src/lib.rs", 7310),
        ("/home/bo/todo.md", 64),
        ("/var/log/syslog", 88_120),
    ];

    let mut tree: Tree<u64> = listing.iter().copied().collect();
    tracing::info!(files = tree.len(), "indexed listing");

    println!("{}", tree.dump());

    if let Some(view) = tree.closeup("/home/ana/") {
        let total: u64 = view.values().sum();
        tracing::info!(
            prefix = %String::from_utf8_lossy(&view.prefix()),
            total,
            "sizes under /home/ana/"
        );
        view.for_each(|path, size| println!("{:>8}  {}", size, String::from_utf8_lossy(path)));
    }

    let previous = tree.insert("/etc/hosts", 310);
    tracing::info!(?previous, "rewrote /etc/hosts");

    tree.remove_branch("/home/ana/src/");
    tree.remove("/var/log/syslog");
    if let Err(err) = tree.validate() {
        tracing::error!(%err, "tree is malformed");
        return;
    }

    let shared = SharedTree::from_tree(tree);
    let homes = shared.with_closeup("/home/", |view| view.map_or(0, |v| v.values().count()));
    tracing::info!(homes, remaining = shared.len(), "after pruning");
    println!("{:?}", &*shared.read());
}
