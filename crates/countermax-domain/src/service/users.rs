//! Operator accounts

use countermax_types::{Error, Result};

use crate::model::User;

fn renumber(users: &mut [User]) {
    for (i, user) in users.iter_mut().enumerate() {
        user.number = i as u32 + 1;
    }
}

fn validate(users: &[User], user: &User, skip: Option<usize>) -> Result<()> {
    if user.id.trim().is_empty() {
        return Err(Error::InvalidInput("user id is required".to_string()));
    }
    let duplicate = users
        .iter()
        .enumerate()
        .any(|(i, u)| Some(i) != skip && u.id == user.id.trim());
    if duplicate {
        return Err(Error::InvalidInput(format!("user id '{}' already exists", user.id.trim())));
    }
    Ok(())
}

pub fn add_user(users: &mut Vec<User>, mut user: User) -> Result<usize> {
    validate(users, &user, None)?;
    user.id = user.id.trim().to_string();
    users.push(user);
    renumber(users);
    Ok(users.len() - 1)
}

pub fn update_user(users: &mut [User], index: usize, mut user: User) -> Result<()> {
    if index >= users.len() {
        return Err(Error::NotFound(format!("user #{}", index + 1)));
    }
    validate(users, &user, Some(index))?;
    user.id = user.id.trim().to_string();
    users[index] = user;
    renumber(users);
    Ok(())
}

pub fn delete_user(users: &mut Vec<User>, id: &str) -> Result<User> {
    let index = users
        .iter()
        .position(|u| u.id == id)
        .ok_or_else(|| Error::NotFound(format!("user '{}'", id)))?;
    let removed = users.remove(index);
    renumber(users);
    Ok(removed)
}

/// USER_NM for a task file; empty when the operator is unknown
pub fn display_name(users: &[User], id: &str) -> String {
    users
        .iter()
        .find(|u| u.id == id)
        .map(|u| u.name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_update_delete() {
        let mut users = Vec::new();
        add_user(&mut users, User::new("kim", "김조사")).unwrap();
        add_user(&mut users, User::new(" lee ", "이조사")).unwrap();
        assert_eq!(users[1].id, "lee");
        assert_eq!(users[1].number, 2);

        assert!(add_user(&mut users, User::new("kim", "중복")).is_err());
        assert!(add_user(&mut users, User::new("", "무명")).is_err());

        update_user(&mut users, 0, User::new("kim", "김수정")).unwrap();
        assert_eq!(display_name(&users, "kim"), "김수정");
        assert!(update_user(&mut users, 0, User::new("lee", "x")).is_err());

        delete_user(&mut users, "kim").unwrap();
        assert_eq!(users[0].number, 1);
        assert_eq!(display_name(&users, "kim"), "");
        assert!(delete_user(&mut users, "kim").is_err());
    }
}
