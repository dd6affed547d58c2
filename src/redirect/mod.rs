//! Redirects declared by records.
//!
//! Records list the URLs that should redirect to them in a field
//! (`redirect_from` by default). This module indexes those declarations,
//! detects conflicts, and exposes each redirect and the nginx redirect map
//! as virtual sources.
//!
//! | Module   | Purpose                                             |
//! |----------|-----------------------------------------------------|
//! | `index`  | `RedirectIndex`, conflict detection                 |
//! | `cache`  | Per-pad index cache                                 |
//! | `source` | `VirtualSource`, `Redirect`, `RedirectMap`          |
//! | `plugin` | `RedirectPlugin` and the hooks it registers         |
//! | `nginx`  | Quoting for nginx map files                         |
//! | `error`  | `InvalidRedirect`, `SetupError`                     |

mod cache;
mod error;
mod index;
mod nginx;
mod plugin;
mod source;

pub use cache::IndexCache;
pub use error::{InvalidRedirect, RecordRef, SetupError};
pub use index::{RedirectIndex, declared_redirects};
pub use nginx::quote_for_map;
pub use plugin::RedirectPlugin;
pub use source::{
    REDIRECT_MAP_PREFIX, REDIRECT_PREFIX, Redirect, RedirectMap, VirtualSource,
};

pub(crate) use source::url_from_pieces;
