//! OKR Engine Walkthrough
//!
//! Loads the sample organisation and walks through the alignment tree,
//! scorecards, guarded deletions, a cascade delete and the key result
//! advisory.

use std::sync::Arc;

use colored::*;
use okr_runtime::seed::sample_workspace;
use okr_runtime::{AlignmentNode, GuardDecision, ModelAdvisor, OkrWorkspace};
use okr_types::{
    EngineConfig, KeyResultDraft, ObjectiveDraft, ObjectiveId, OkrResult, OwnerRef, ScoreBand,
    SequentialGenerator, TeamId, UserId,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> OkrResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = EngineConfig::load("okr.toml")?;

    println!("{}", "╔══════════════════════════════════════════════════════╗".cyan());
    println!("{}", "║            OKR Alignment Engine Walkthrough          ║".cyan());
    println!("{}", "╚══════════════════════════════════════════════════════╝".cyan());
    println!();

    let advisor = ModelAdvisor::from_env(config.advisory.clone());
    let mut ws = sample_workspace()?
        .with_id_generator(SequentialGenerator::new())
        .with_advisor(Arc::new(advisor));

    show_tree(&ws)?;
    println!();

    demo_guards(&mut ws)?;
    println!();

    demo_create_and_cascade(&mut ws)?;
    println!();

    demo_advisory(&ws).await;

    println!();
    println!("{}", "Walkthrough complete!".green().bold());
    Ok(())
}

fn section(title: &str) {
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".yellow());
    println!("{}", format!("  {}", title).yellow().bold());
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".yellow());
}

fn paint(text: String, band: ScoreBand) -> ColoredString {
    match band {
        ScoreBand::OnTrack => text.green(),
        ScoreBand::AtRisk => text.yellow(),
        ScoreBand::OffTrack => text.red(),
    }
}

fn show_tree(ws: &OkrWorkspace) -> OkrResult<()> {
    section("Alignment tree (Q3 2024)");
    for root in ws.alignment_tree()? {
        show_node(ws, &root)?;
    }
    Ok(())
}

fn show_node(ws: &OkrWorkspace, node: &AlignmentNode) -> OkrResult<()> {
    let store = ws.store();
    let Some(objective) = store.objective(&node.objective_id) else {
        return Ok(());
    };
    let card = ws.scorecard(&node.objective_id)?;
    let owner = store
        .resolve_owner(&objective.owner)
        .map(|view| view.name.to_string())
        .unwrap_or_else(|| objective.owner.to_string());

    let indent = "    ".repeat(node.depth);
    println!(
        "{}{} {} {}",
        indent,
        format!("[{}]", objective.objective_type).dimmed(),
        objective.title.bold(),
        format!("({}, {})", owner, objective.level).dimmed()
    );
    println!(
        "{}    progress {}  score {}",
        indent,
        paint(format!("{:>3}%", card.display_percent), card.progress_band),
        paint(card.final_score.to_string(), card.score_band)
    );

    for child in &node.children {
        show_node(ws, child)?;
    }
    Ok(())
}

fn demo_guards(ws: &mut OkrWorkspace) -> OkrResult<()> {
    section("Integrity guard");

    let checks = [UserId::new("u1"), UserId::new("u2"), UserId::new("u3")];
    for user_id in &checks {
        match ws.check_user_deletion(user_id)? {
            GuardDecision::Allow(_) => {
                println!("  delete user {:<4} {}", user_id.as_str(), "allowed".green());
            }
            GuardDecision::Deny(denial) => {
                println!("  delete user {:<4} {} {}", user_id.as_str(), "denied:".red(), denial);
            }
        }
    }

    match ws.check_team_deletion(&TeamId::new("t1"))? {
        GuardDecision::Allow(_) => println!("  delete team t1   {}", "allowed".green()),
        GuardDecision::Deny(denial) => {
            println!("  delete team t1   {} {}", "denied:".red(), denial)
        }
    }

    let removal = ws.delete_user(&UserId::new("u2"))?;
    println!("  {} {}", "removed".green(), removal.user.name);
    Ok(())
}

fn demo_create_and_cascade(ws: &mut OkrWorkspace) -> OkrResult<()> {
    section("Create, then cascade delete");

    let draft = ObjectiveDraft::new("Stabilise the release pipeline", OwnerRef::user("u1"))
        .with_parent(ObjectiveId::new("o2"))
        .with_key_result(KeyResultDraft::new("Cut failed deploys per week", 3.0, 0.0, "deploys"));
    let id = ws.create_objective(draft)?;
    println!("  created {} under o2", id);

    let plan = ws.plan_objective_deletion(&ObjectiveId::new("o2"))?;
    let affected: Vec<String> = plan.affected_ids().iter().map(|id| id.to_string()).collect();
    println!(
        "  deleting o2 would remove {} objective(s): {}",
        plan.len(),
        affected.join(", ")
    );

    let removed = ws.commit_objective_deletion(plan)?;
    println!("  {} {} objective(s)", "removed".green(), removed.len());

    show_tree(ws)
}

async fn demo_advisory(ws: &OkrWorkspace) {
    section("Key result advisory");
    for description in ["Help the sales team", "Increase enterprise SQLs by 15%"] {
        let outcome = ws.advise_key_result(description).await;
        match outcome.verdict() {
            Some(verdict) if verdict.is_valid => {
                println!("  {:<34} {} {}", description, "ok".green(), verdict.feedback)
            }
            Some(verdict) => {
                println!("  {:<34} {} {}", description, "weak".red(), verdict.feedback)
            }
            None => println!("  {:<34} {}", description, "advisory unavailable".dimmed()),
        }
    }
}
