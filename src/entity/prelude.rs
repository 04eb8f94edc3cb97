pub use super::api::Entity as ApiEntity;
pub use super::group::Entity as GroupEntity;
pub use super::parameter::Entity as ParameterEntity;
