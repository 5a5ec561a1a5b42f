//! Community entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "communities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::resident::Entity")]
    Resident,
    #[sea_orm(has_many = "super::parking_spot::Entity")]
    ParkingSpot,
}

impl Related<super::resident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resident.def()
    }
}

impl Related<super::parking_spot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
