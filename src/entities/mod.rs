pub mod product;

pub use product::Entity as Product;
pub use product::Model as ProductModel;
