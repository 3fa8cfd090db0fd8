// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use mailblocks_engine::{Block, BlockType, Document};

#[allow(dead_code)]
pub fn generate_document(repeats: usize) -> Document {
    let mut doc = Document::new();
    for _ in 0..repeats {
        for kind in BlockType::ALL {
            doc.blocks.push(Block::with_defaults(kind));
        }
    }
    doc.settings.preheader = "Benchmark preheader".to_string();
    doc
}
