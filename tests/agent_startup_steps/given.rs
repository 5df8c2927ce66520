//! Given steps for agent start-up scenarios.

use std::time::Duration;

use super::world::{StartupWorld, agent_id, agent_ids, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use switchyard::agent_registry::{
    adapters::memory::StaticAgent,
    domain::{AgentCapability, AgentStatus, AgentType},
};

fn operational(name: &str) -> Result<StaticAgent, eyre::Report> {
    Ok(
        StaticAgent::new(agent_id(name)?, AgentType::OperationalCoordination)
            .with_capability(AgentCapability::DeploymentCoordination, 70),
    )
}

#[given(r#"a registered agent "{name}" with no dependencies"#)]
fn agent_without_dependencies(world: &mut StartupWorld, name: String) -> Result<(), eyre::Report> {
    let agent = operational(&name)?;
    world.register(&name, agent)
}

#[given(r#"a registered agent "{name}" depending on "{dependency}""#)]
fn agent_with_dependency(
    world: &mut StartupWorld,
    name: String,
    dependency: String,
) -> Result<(), eyre::Report> {
    let agent = operational(&name)?.with_dependency(agent_id(&dependency)?);
    world
        .register(&name, agent)
        .wrap_err_with(|| format!("register {name} after {dependency}"))
}

#[given(r#"a registered agent "{name}" that needs reinitializing"#)]
fn agent_needing_reinitialization(
    world: &mut StartupWorld,
    name: String,
) -> Result<(), eyre::Report> {
    let agent = operational(&name)?
        .with_status(AgentStatus::degraded("cold start"))
        .with_latency(Duration::from_millis(20));
    world.register(&name, agent)
}

#[given(r#"a registered agent "{name}" that fails to initialize"#)]
fn agent_failing_initialization(
    world: &mut StartupWorld,
    name: String,
) -> Result<(), eyre::Report> {
    let agent = operational(&name)?
        .with_status(AgentStatus::degraded("missing credentials"))
        .failing_reinitialize();
    world.register(&name, agent)
}

#[given(r#"the agents "{names}" have been started"#)]
fn agents_started(world: &mut StartupWorld, names: String) -> Result<(), eyre::Report> {
    let ids = agent_ids(&names)?;
    run_async(world.loader.load_all_with_dependencies(&ids)).wrap_err("start agents for scenario")?;
    Ok(())
}

#[given(r#"a security agent "{name}" rated {rating:u8}"#)]
fn security_agent(world: &mut StartupWorld, name: String, rating: u8) -> Result<(), eyre::Report> {
    let agent = StaticAgent::new(agent_id(&name)?, AgentType::TechnologyBridge)
        .with_capability(AgentCapability::SecurityCoordination, rating);
    world.register(&name, agent)
}
