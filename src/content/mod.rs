//! Content tree: records, snapshots, loading and traversal.
//!
//! | Module   | Purpose                                        |
//! |----------|------------------------------------------------|
//! | `record` | `Record`, `Asset`, `Source`                    |
//! | `pad`    | `Pad` snapshot, lookups, URL resolution        |
//! | `load`   | Loading a pad from `content/` and `assets/`    |
//! | `walk`   | Breadth-first walk over every record           |

mod load;
mod pad;
mod record;
mod walk;

#[cfg(test)]
pub(crate) mod fixture;

pub use load::{CONTENTS_FILE, LoadError, load_pad};
pub use pad::{Pad, PadBuilder, PadId, Resolved};
pub use record::{Asset, Record, RecordId, RecordKind, Source};
pub use walk::walk_records;
