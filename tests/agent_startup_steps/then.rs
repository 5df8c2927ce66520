//! Then steps for agent start-up scenarios.

use super::world::{StartupWorld, agent_id, agent_ids};
use rstest_bdd_macros::then;
use switchyard::{
    discovery::domain::RoutingType,
    loader::domain::{LoadError, LoadingState},
};

#[then(r#"the start-up order is "{names}""#)]
fn start_up_order(world: &StartupWorld, names: String) -> Result<(), eyre::Report> {
    let expected = agent_ids(&names)?;
    let report = world
        .last_start
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no start-up attempted in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("start-up failed: {err}"))?;
    if report.loading_order() != expected.as_slice() {
        return Err(eyre::eyre!(
            "expected start-up order {expected:?}, got {:?}",
            report.loading_order()
        ));
    }
    Ok(())
}

#[then(r#"the agent "{name}" is "{state}""#)]
fn agent_in_state(world: &StartupWorld, name: String, state: String) -> Result<(), eyre::Report> {
    let expected = LoadingState::try_from(state.as_str())?;
    let actual = world.loader.state_of(&agent_id(&name)?)?;
    if actual != expected {
        return Err(eyre::eyre!("expected {name} to be {expected}, found {actual}"));
    }
    Ok(())
}

#[then("every start request succeeds")]
fn every_start_succeeds(world: &StartupWorld) -> Result<(), eyre::Report> {
    if world.concurrent_starts.is_empty() {
        return Err(eyre::eyre!("no concurrent starts recorded"));
    }
    if let Some(Err(err)) = world.concurrent_starts.iter().find(|start| start.is_err()) {
        return Err(eyre::eyre!("a concurrent start failed: {err}"));
    }
    Ok(())
}

#[then(r#""{name}" was reinitialized {count:usize} times"#)]
fn reinitialized_times(world: &StartupWorld, name: String, count: usize) -> Result<(), eyre::Report> {
    let calls = world.agent(&name)?.reinitialize_calls();
    if calls != count {
        return Err(eyre::eyre!(
            "expected {name} to be reinitialized {count} times, got {calls}"
        ));
    }
    Ok(())
}

#[then(r#"start-up fails because "{name}" could not initialize"#)]
fn start_up_fails(world: &StartupWorld, name: String) -> Result<(), eyre::Report> {
    let expected = agent_id(&name)?;
    let result = world
        .last_start
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no start-up attempted in scenario world"))?;
    match result {
        Err(LoadError::InitializationFailed { agent, .. }) if *agent == expected => Ok(()),
        other => Err(eyre::eyre!(
            "expected {name} to fail initialization, got {other:?}"
        )),
    }
}

#[then(r#"the shut-down order is "{names}""#)]
fn shut_down_order(world: &StartupWorld, names: String) -> Result<(), eyre::Report> {
    let expected = agent_ids(&names)?;
    let report = world
        .last_stop
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no shut-down attempted in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("shut-down failed: {err}"))?;
    if report.unloaded() != expected.as_slice() {
        return Err(eyre::eyre!(
            "expected shut-down order {expected:?}, got {:?}",
            report.unloaded()
        ));
    }
    Ok(())
}

#[then(r#"the request is handled by "{name}" alone"#)]
fn handled_alone(world: &StartupWorld, name: String) -> Result<(), eyre::Report> {
    let expected = agent_id(&name)?;
    let outcome = world
        .last_dispatch
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no dispatch attempted in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("dispatch failed: {err}"))?;
    if outcome.routing_type() != RoutingType::Single {
        return Err(eyre::eyre!(
            "expected single routing, got {}",
            outcome.routing_type()
        ));
    }
    let handlers: Vec<_> = outcome.handled_by().collect();
    if handlers != [&expected] {
        return Err(eyre::eyre!("expected only {name} to answer, got {handlers:?}"));
    }
    Ok(())
}
