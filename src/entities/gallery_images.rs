use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "gallery_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub variation_id: i32,
    pub image: String,
    /// Display order within the variation; ties broken by id.
    pub position: i64,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::variations::Entity",
        from = "Column::VariationId",
        to = "super::variations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Variations,
}

impl Related<super::variations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
