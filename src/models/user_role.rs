//! Models for managing Roles

use std::time::SystemTime;

use diesel::sql_types::VarChar;

use models::UserId;
use schema::user_roles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum Role {
    Superuser,
    User,
}
enum_varchar_sql!(Role {
    Superuser => b"superuser",
    User => b"user",
});

#[derive(Serialize, Queryable, Insertable, Debug, Identifiable, Clone)]
#[table_name = "user_roles"]
pub struct UserRole {
    pub id: i32,
    pub user_id: UserId,
    pub name: Role,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

#[derive(Serialize, Deserialize, Insertable, Clone, Debug)]
#[table_name = "user_roles"]
pub struct NewUserRole {
    pub user_id: UserId,
    pub name: Role,
}
