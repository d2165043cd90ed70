use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CURRENT_USER_TEMP_ID, Contact, NewContactRequest};
use crate::repository;
use crate::store::DocumentStore;
use crate::validation;

/// Contact plus the avatar data the list renders.
#[derive(Debug, Clone, Serialize)]
pub struct ContactCard {
    #[serde(flatten)]
    pub contact: Contact,
    pub initials: String,
    pub color_class: String,
}

impl From<Contact> for ContactCard {
    fn from(contact: Contact) -> Self {
        let name = contact.full_name();
        Self {
            initials: initials(&name),
            color_class: format!("initials_color_{}", avatar_color_index(&name)),
            contact,
        }
    }
}

/// First letter of every space-separated word, upper-cased.
pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase()
}

/// Stable colour bucket in `0..15` derived from the name, matching the hash
/// the web client uses for avatars. Only the shift wraps to 32 bits; the
/// running sum does not.
pub fn avatar_color_index(name: &str) -> u32 {
    let mut hash: i64 = 0;
    for unit in name.encode_utf16() {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        hash = unit as i64 + shifted - hash;
    }
    (hash.unsigned_abs() % 15) as u32
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Splits a full name into a capitalized first name and last name. Words
/// after the first all go to the last name.
pub fn split_and_capitalize_name(name: &str) -> (String, String) {
    let mut words = name.split_whitespace();
    let first = words.next().map(capitalize).unwrap_or_default();
    let last = words.map(capitalize).collect::<Vec<_>>().join(" ");
    (first, last)
}

pub fn sort_by_first_name(contacts: &mut [Contact]) {
    contacts.sort_by_key(|contact| contact.firstname.to_uppercase());
}

/// Puts a temporary entry for the logged-in user at the front of the list
/// when no contact carries their full name yet.
pub fn ensure_current_user(contacts: Vec<Contact>, user_name: Option<&str>) -> Vec<Contact> {
    let Some(user_name) = user_name.filter(|name| !name.trim().is_empty()) else {
        return contacts;
    };
    if contacts.iter().any(|c| c.full_name() == user_name) {
        return contacts;
    }

    let (firstname, lastname) = split_and_capitalize_name(user_name);
    let mut with_user = Vec::with_capacity(contacts.len() + 1);
    with_user.push(Contact {
        id: CURRENT_USER_TEMP_ID.to_string(),
        firstname,
        lastname,
        email: String::new(),
        phone: None,
        is_temporary: true,
    });
    with_user.extend(contacts);
    with_user
}

pub async fn list_contacts(store: &dyn DocumentStore) -> Result<Vec<Contact>, AppError> {
    let mut contacts: Vec<Contact> = repository::fetch_contacts(store)
        .await?
        .into_iter()
        .map(|keyed| keyed.record)
        .collect();
    sort_by_first_name(&mut contacts);
    Ok(contacts)
}

pub async fn create_contact(store: &dyn DocumentStore, req: NewContactRequest) -> Result<Contact, AppError> {
    let req = validation::sanitize_contact(&req);
    validation::validate_contact(&req)?;

    let (firstname, lastname) = split_and_capitalize_name(&req.name);
    let contact = Contact {
        id: Uuid::new_v4().to_string(),
        firstname,
        lastname,
        email: req.email,
        phone: Some(req.phone),
        is_temporary: false,
    };

    let key = repository::insert_contact(store, &contact).await?;
    info!("Created contact {} under {}", contact.id, key);
    Ok(contact)
}

pub async fn update_contact(
    store: &dyn DocumentStore,
    id: &str,
    req: NewContactRequest,
) -> Result<Contact, AppError> {
    let req = validation::sanitize_contact(&req);
    validation::validate_contact(&req)?;

    let stored = repository::find_contact(store, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let (firstname, lastname) = split_and_capitalize_name(&req.name);
    let contact = Contact {
        id: stored.record.id,
        firstname,
        lastname,
        email: req.email,
        phone: Some(req.phone),
        is_temporary: false,
    };

    repository::overwrite_contact(store, &stored.key, &contact).await?;
    info!("Updated contact {}", contact.id);
    Ok(contact)
}

pub async fn delete_contact(store: &dyn DocumentStore, id: &str) -> Result<(), AppError> {
    let stored = repository::find_contact(store, id)
        .await?
        .ok_or(AppError::NotFound)?;

    repository::delete_contact(store, &stored.key).await?;
    info!("Deleted contact {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn contact(id: &str, firstname: &str, lastname: &str) -> Contact {
        Contact {
            id: id.to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            email: format!("{}@example.com", firstname.to_lowercase()),
            phone: None,
            is_temporary: false,
        }
    }

    #[test]
    fn test_initials_and_color_class() {
        assert_eq!(initials("anna berg"), "AB");
        assert_eq!(initials("Sofia Maria Müller"), "SMM");

        // Same buckets the web client computes.
        assert_eq!(avatar_color_index("Anna Berg"), 14);
        assert_eq!(avatar_color_index("Max Power"), 5);
        assert_eq!(avatar_color_index(""), 0);
    }

    #[test]
    fn test_split_and_capitalize_name() {
        assert_eq!(
            split_and_capitalize_name("anna berg"),
            ("Anna".to_string(), "Berg".to_string())
        );
        assert_eq!(
            split_and_capitalize_name("émile de la croix"),
            ("Émile".to_string(), "De La Croix".to_string())
        );
    }

    #[test]
    fn test_sort_is_case_insensitive_on_first_name() {
        let mut contacts = vec![
            contact("1", "bob", "Stone"),
            contact("2", "Anna", "Berg"),
            contact("3", "Carl", "Ode"),
        ];
        sort_by_first_name(&mut contacts);

        let names: Vec<&str> = contacts.iter().map(|c| c.firstname.as_str()).collect();
        assert_eq!(names, vec!["Anna", "bob", "Carl"]);
    }

    #[test]
    fn test_ensure_current_user_prepends_temporary_contact() {
        let contacts = vec![contact("1", "Anna", "Berg")];

        let unchanged = ensure_current_user(contacts.clone(), Some("Anna Berg"));
        assert_eq!(unchanged, contacts);

        let with_user = ensure_current_user(contacts.clone(), Some("Max Power"));
        assert_eq!(with_user.len(), 2);
        assert_eq!(with_user[0].id, CURRENT_USER_TEMP_ID);
        assert!(with_user[0].is_temporary);

        assert_eq!(ensure_current_user(contacts.clone(), None), contacts);
    }

    #[tokio::test]
    async fn test_create_update_delete_contact() {
        let store = MemoryStore::new();
        let created = create_contact(
            &store,
            NewContactRequest {
                name: "anna  berg".to_string(),
                email: "anna@example.com".to_string(),
                phone: "0170 1234567".to_string(),
            },
        )
        .await
        .expect("create should succeed");
        assert_eq!(created.firstname, "Anna");
        assert_eq!(created.phone.as_deref(), Some("01701234567"));

        let updated = update_contact(
            &store,
            &created.id,
            NewContactRequest {
                name: "Anna Lind".to_string(),
                email: "anna.lind@example.com".to_string(),
                phone: "0170 7654321".to_string(),
            },
        )
        .await
        .expect("update should succeed");
        assert_eq!(updated.id, created.id);

        let listed = list_contacts(&store).await.expect("list");
        assert_eq!(listed, vec![updated]);

        delete_contact(&store, &created.id).await.expect("delete");
        assert!(list_contacts(&store).await.expect("list").is_empty());
        assert!(matches!(
            delete_contact(&store, &created.id).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_invalid_contact_is_not_written() {
        let store = MemoryStore::new();
        let result = create_contact(
            &store,
            NewContactRequest {
                name: "Anna".to_string(),
                email: "anna@example.com".to_string(),
                phone: "0170 1234567".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(store.writes(), 0);
    }
}
