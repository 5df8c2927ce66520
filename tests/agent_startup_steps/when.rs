//! When steps for agent start-up scenarios.

use super::world::{StartupWorld, agent_id, agent_ids, run_async};
use futures::future::join_all;
use mockable::DefaultClock;
use rstest_bdd_macros::when;
use switchyard::agent_registry::domain::{AgentCapability, AgentRequest};

#[when(r#"the agents "{names}" are started"#)]
fn start_agents(world: &mut StartupWorld, names: String) -> Result<(), eyre::Report> {
    let ids = agent_ids(&names)?;
    world.last_start = Some(run_async(world.loader.load_all_with_dependencies(&ids)));
    Ok(())
}

#[when(r#""{name}" is started {count:usize} times concurrently"#)]
fn start_concurrently(
    world: &mut StartupWorld,
    name: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let id = agent_id(&name)?;
    let loads: Vec<_> = (0..count)
        .map(|_| world.loader.load_with_dependencies(&id))
        .collect();
    world.concurrent_starts = run_async(join_all(loads));
    Ok(())
}

#[when(r#"the agents "{names}" are stopped"#)]
fn stop_agents(world: &mut StartupWorld, names: String) -> Result<(), eyre::Report> {
    let ids = agent_ids(&names)?;
    world.last_stop = Some(world.loader.unload_all_with_dependencies(&ids));
    Ok(())
}

#[when("an urgent security request is dispatched")]
fn dispatch_urgent_request(world: &mut StartupWorld) {
    let request = AgentRequest::new(
        "incident",
        "rotate the signing keys",
        AgentCapability::SecurityCoordination,
        "positivity",
        &DefaultClock,
    )
    .with_priority(9);
    world.last_dispatch = Some(run_async(world.dispatcher.dispatch(&request)));
}
