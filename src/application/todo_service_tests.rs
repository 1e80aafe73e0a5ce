#[cfg(test)]
mod tests {
    use super::super::todo_service::{TodoService, TodoServiceImpl};
    use crate::domain::{error::TodoError, todo::{CreateTodo, TodoId, TodoStatus, UpdateTodo}};
    use crate::infrastructure::memory_repo::InMemoryTodoRepository;

    fn service() -> TodoServiceImpl<InMemoryTodoRepository> {
        TodoServiceImpl::new(InMemoryTodoRepository::new())
    }

    fn titled(title: &str) -> CreateTodo {
        CreateTodo { title: title.into(), ..Default::default() }
    }

    // Status strings reach the store the way both adapters send them: parsed first.
    async fn update_status(service: &impl TodoService, id: TodoId, status: &str) -> Result<crate::domain::todo::Todo, TodoError> {
        let status = status.parse::<TodoStatus>()?;
        service.update(id, UpdateTodo { status: Some(status), ..Default::default() }).await
    }

    #[tokio::test]
    async fn unit_create_and_get() {
        let service = service();
        let created = service.create(CreateTodo { title: "A".into(), description: None, status: Some(TodoStatus::Pending) }).await.unwrap();
        let got = service.get(created.id).await.unwrap();
        assert_eq!(got.title, "A");
        assert_eq!(got.status, TodoStatus::Pending);
        assert_eq!(got.created_at, got.updated_at);
    }

    #[tokio::test]
    async fn ids_strictly_increase_in_call_order() {
        let service = service();
        let mut last = None;
        for i in 0..10 {
            let id = service.create(titled(&format!("t{i}"))).await.unwrap().id;
            if let Some(prev) = last { assert!(id > prev); }
            last = Some(id);
        }
    }

    #[tokio::test]
    async fn empty_title_is_rejected_without_side_effects() {
        let service = service();
        service.create(titled("keep")).await.unwrap();
        let err = service.create(titled("")).await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        assert_eq!(service.list().await.unwrap().len(), 1);
        // The failed create must not consume an id.
        assert_eq!(service.create(titled("next")).await.unwrap().id, TodoId(2));
    }

    #[tokio::test]
    async fn bogus_status_leaves_todo_unchanged() {
        let service = service();
        let created = service.create(titled("A")).await.unwrap();
        let err = update_status(&service, created.id, "bogus").await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        assert_eq!(service.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn empty_title_update_leaves_todo_unchanged() {
        let service = service();
        let created = service.create(titled("A")).await.unwrap();
        let err = service.update(created.id, UpdateTodo { title: Some("  ".into()), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        assert_eq!(service.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let service = service();
        let created = service.create(titled("A")).await.unwrap();
        let missing = TodoId(created.id.0 + 100);
        assert_eq!(service.get(missing).await.unwrap_err(), TodoError::NotFound(missing));
        assert_eq!(service.update(missing, UpdateTodo::default()).await.unwrap_err(), TodoError::NotFound(missing));
        assert_eq!(service.delete(missing).await.unwrap_err(), TodoError::NotFound(missing));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_idempotent() {
        let service = service();
        for t in ["a", "b", "c"] { service.create(titled(t)).await.unwrap(); }
        let first = service.list().await.unwrap();
        let second = service.list().await.unwrap();
        assert_eq!(first, second);
        let titles: Vec<_> = first.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn partial_update_touches_only_supplied_fields() {
        let service = service();
        let created = service.create(CreateTodo { title: "A".into(), description: Some("desc".into()), status: None }).await.unwrap();
        let updated = update_status(&service, created.id, "completed").await.unwrap();
        assert_eq!(updated.title, "A");
        assert_eq!(updated.description, "desc");
        assert_eq!(updated.status, TodoStatus::Completed);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn end_to_end_scenario() {
        let service = service();
        let created = service.create(CreateTodo { title: "Learn MCP".into(), description: None, status: Some(TodoStatus::Pending) }).await.unwrap();
        assert_eq!(created.id, TodoId(1));

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Learn MCP");
        assert_eq!(listed[0].status, TodoStatus::Pending);

        let updated = update_status(&service, TodoId(1), "completed").await.unwrap();
        assert_eq!(updated.id, TodoId(1));
        assert_eq!(updated.status, TodoStatus::Completed);

        assert!(service.delete(TodoId(1)).await.unwrap());
        assert_eq!(service.get(TodoId(1)).await.unwrap_err(), TodoError::NotFound(TodoId(1)));
    }
}
