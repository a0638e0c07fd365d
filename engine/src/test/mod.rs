mod unit;

use vigil_graph::CallFactory;
use vigil_graph::test::helpers::{All, AnyOf, Forward, Lowercase, Presence};

/// Factory without a `field` call, so the engine registers its own.
pub(crate) fn factory() -> CallFactory {
    let mut factory = CallFactory::new();
    factory
        .add_abelian("and", All)
        .add_abelian("or", AnyOf)
        .add_call("forward", Forward)
        .add_map("lower", Lowercase)
        .add_map("presence", Presence)
        .add_alias("any", "or");
    factory
}
