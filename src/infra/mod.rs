// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns shared by the use cases:
//
//   layout.rs      — where every input and output lives below
//                    the data prefix
//
//   split_store.rs — .npz archives of split indices, with the
//                    guard against replacing outer splits, and
//                    the JSON run summary
//
//   logging.rs     — one-time tracing subscriber setup
//
//   plot.rs        — HTML pages with interactive line plots

/// Data prefix path resolution
pub mod layout;

/// Split archive persistence
pub mod split_store;

/// Tracing subscriber initialisation
pub mod logging;

/// Interactive HTML line plots
pub mod plot;
