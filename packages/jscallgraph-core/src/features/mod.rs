//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure data and invariants
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - Implementations of the ports and engines
//!
//! Dependency order, leaves first: program → context / points_to → call_graph → driver

// Program Representation Store: SSA functions, entry points, JSON loader
pub mod program;

// Calling contexts, context selectors and instance-key policies
pub mod context;

// Worklist points-to propagation engine
pub mod points_to;

// Call-graph builder and dispatch resolver
pub mod call_graph;

// Driver: timeout/cancel monitor, statistics, edge listing
pub mod driver;
