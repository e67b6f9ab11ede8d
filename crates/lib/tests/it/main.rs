/*! Integration tests for bigraph-schema.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - tree: Tests for path navigation, mutation and pruning
 * - registry: Tests for the generic Registry and its contracts
 * - merge: Tests for type_merge, deep_merge and validate_merge
 * - types: Tests for the TypeRegistry, organized by concern
 * - apply: Tests for the type-driven apply engine
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("bigraph_schema=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod apply;
mod merge;
mod tree;
mod types;
