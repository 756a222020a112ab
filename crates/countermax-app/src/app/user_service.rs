//! Operator account use cases

use chrono::{Months, NaiveDate};

use countermax_domain::model::{ConfigTree, User, UserRole};
use countermax_domain::service::users;
use countermax_types::Result;

/// Register an operator valid for one year from `today`; returns its 번호
pub fn add_user(tree: &mut ConfigTree, id: &str, name: &str, role: UserRole, today: NaiveDate) -> Result<u32> {
    let mut user = User::new(id, name.trim());
    user.role = role;
    user.reg_date = Some(today);
    user.start = Some(today);
    user.end = today.checked_add_months(Months::new(12));
    let index = users::add_user(&mut tree.users, user)?;
    Ok(tree.users[index].number)
}

pub fn delete_user(tree: &mut ConfigTree, id: &str) -> Result<User> {
    users::delete_user(&mut tree.users, id.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use countermax_types::Error;

    #[test]
    fn test_add_and_delete_renumber() {
        let mut tree = ConfigTree::default();
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(add_user(&mut tree, "kim", "김조사", UserRole::Operator, today).unwrap(), 1);
        assert_eq!(add_user(&mut tree, " lee ", "이조사", UserRole::Admin, today).unwrap(), 2);
        assert!(matches!(
            add_user(&mut tree, "lee", "중복", UserRole::Operator, today),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(tree.users[1].end, NaiveDate::from_ymd_opt(2025, 2, 28));

        delete_user(&mut tree, "kim").unwrap();
        assert_eq!(tree.users[0].id, "lee");
        assert_eq!(tree.users[0].number, 1);
        assert!(delete_user(&mut tree, "kim").is_err());
    }
}
