use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::AppError;
use crate::models::{Contact, SubtaskList, Task, TaskId, User};
use crate::store::dto::SubtaskListsPatch;
use crate::store::{Collection, DocumentStore};

/// A record together with the key the store filed it under.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    pub key: String,
    pub record: T,
}

async fn fetch_collection<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
) -> Result<Vec<Keyed<T>>, AppError> {
    let records = store.fetch_all(collection).await?;
    let mut parsed = Vec::with_capacity(records.len());

    for (key, value) in records {
        match serde_json::from_value::<T>(value) {
            Ok(record) => parsed.push(Keyed { key, record }),
            Err(e) => {
                warn!("Failed to parse {} record {}: {}", collection.path(), key, e);
            }
        }
    }

    Ok(parsed)
}

async fn insert<T: Serialize>(
    store: &dyn DocumentStore,
    collection: Collection,
    record: &T,
) -> Result<String, AppError> {
    let value = serde_json::to_value(record)?;
    store.create(collection, &value).await
}

async fn overwrite<T: Serialize>(
    store: &dyn DocumentStore,
    collection: Collection,
    key: &str,
    record: &T,
) -> Result<(), AppError> {
    let value = serde_json::to_value(record)?;
    store.put(collection, key, &value).await
}

pub async fn fetch_tasks(store: &dyn DocumentStore) -> Result<Vec<Keyed<Task>>, AppError> {
    fetch_collection(store, Collection::Tasks).await
}

/// Looks a task up by its client-side id. The first record wins when ids
/// collide.
pub async fn find_task(store: &dyn DocumentStore, id: TaskId) -> Result<Option<Keyed<Task>>, AppError> {
    let tasks = fetch_tasks(store).await?;
    Ok(tasks.into_iter().find(|task| task.record.id == id))
}

pub async fn insert_task(store: &dyn DocumentStore, task: &Task) -> Result<String, AppError> {
    insert(store, Collection::Tasks, task).await
}

pub async fn overwrite_task(store: &dyn DocumentStore, key: &str, task: &Task) -> Result<(), AppError> {
    overwrite(store, Collection::Tasks, key, task).await
}

/// Writes only the two subtask lists of the stored task.
pub async fn patch_subtask_lists(store: &dyn DocumentStore, key: &str, task: &Task) -> Result<(), AppError> {
    let body = SubtaskListsPatch {
        open: task.subtasks(SubtaskList::Open),
        closed: task.subtasks(SubtaskList::Closed),
    };
    let value = serde_json::to_value(&body)?;
    store.patch(Collection::Tasks, key, &value).await
}

pub async fn delete_task(store: &dyn DocumentStore, key: &str) -> Result<(), AppError> {
    store.delete(Collection::Tasks, key).await
}

pub async fn fetch_contacts(store: &dyn DocumentStore) -> Result<Vec<Keyed<Contact>>, AppError> {
    fetch_collection(store, Collection::Contacts).await
}

pub async fn find_contact(store: &dyn DocumentStore, id: &str) -> Result<Option<Keyed<Contact>>, AppError> {
    let contacts = fetch_contacts(store).await?;
    Ok(contacts.into_iter().find(|contact| contact.record.id == id))
}

pub async fn insert_contact(store: &dyn DocumentStore, contact: &Contact) -> Result<String, AppError> {
    insert(store, Collection::Contacts, contact).await
}

pub async fn overwrite_contact(store: &dyn DocumentStore, key: &str, contact: &Contact) -> Result<(), AppError> {
    overwrite(store, Collection::Contacts, key, contact).await
}

pub async fn delete_contact(store: &dyn DocumentStore, key: &str) -> Result<(), AppError> {
    store.delete(Collection::Contacts, key).await
}

pub async fn fetch_users(store: &dyn DocumentStore) -> Result<Vec<Keyed<User>>, AppError> {
    fetch_collection(store, Collection::Users).await
}

pub async fn insert_user(store: &dyn DocumentStore, user: &User) -> Result<String, AppError> {
    insert(store, Collection::Users, user).await
}
