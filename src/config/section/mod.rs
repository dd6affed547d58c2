//! Configuration section definitions.
//!
//! Each module corresponds to a section in `waymark.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `build`    | `[build]`      | Content, assets, templates, output   |
//! | `redirect` | `[redirect]`   | Redirect field, template, map file   |
//! | `site`     | `[site]`       | Site URL (base path)                 |

mod build;
mod redirect;
mod site;

pub use build::BuildConfig;
pub use redirect::{DEFAULT_TEMPLATE, RedirectConfig};
pub use site::SiteInfoConfig;
