//! Then steps for task status BDD scenarios.

use super::world::{TaskStatusWorld, run_async};
use rstest_bdd_macros::then;
use tasknotes::task::{
    domain::{TaskDomainError, TaskErrorKind, TaskStatus},
    services::{ListTasksRequest, TaskLifecycleError},
};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskStatusWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world
        .last_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;

    let stored = run_async(world.service.get_task(task.id()))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then("creation fails because the title is empty")]
fn creation_fails_with_empty_title(world: &TaskStatusWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result"))?;

    if !matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::EmptyTitle))
    ) {
        return Err(eyre::eyre!("expected EmptyTitle error, got {result:?}"));
    }
    Ok(())
}

#[then("the operation fails because the task was not found")]
fn operation_fails_with_not_found(world: &TaskStatusWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result"))?;

    match result {
        Err(err) if err.kind() == TaskErrorKind::NotFound => Ok(()),
        other => Err(eyre::eyre!("expected a not-found error, got {other:?}")),
    }
}

#[then("page {page:u32} of size {size:u32} lists {count:u32} task out of {total:u32}")]
fn page_lists_one_task(
    world: &TaskStatusWorld,
    page: u32,
    size: u32,
    count: u32,
    total: u32,
) -> Result<(), eyre::Report> {
    check_page(world, page, size, count, total)
}

#[then("page {page:u32} of size {size:u32} lists {count:u32} tasks out of {total:u32}")]
fn page_lists_tasks(
    world: &TaskStatusWorld,
    page: u32,
    size: u32,
    count: u32,
    total: u32,
) -> Result<(), eyre::Report> {
    check_page(world, page, size, count, total)
}

fn check_page(
    world: &TaskStatusWorld,
    page: u32,
    size: u32,
    count: u32,
    total: u32,
) -> Result<(), eyre::Report> {
    let listed = run_async(world.service.list_tasks(ListTasksRequest::new(page, size)))?;
    let expected_count = usize::try_from(count)?;
    let expected_total = usize::try_from(total)?;
    eyre::ensure!(
        listed.items.len() == expected_count,
        "expected {count} items, found {}",
        listed.items.len()
    );
    eyre::ensure!(
        listed.total == expected_total,
        "expected total {total}, found {}",
        listed.total
    );
    Ok(())
}
