pub mod create_supplier_command;
pub mod create_supplier_contact_command;
pub mod delete_supplier_command;
pub mod delete_supplier_contact_command;
pub mod update_supplier_command;
pub mod update_supplier_contact_command;

pub use create_supplier_command::CreateSupplierCommand;
pub use create_supplier_contact_command::CreateSupplierContactCommand;
pub use delete_supplier_command::DeleteSupplierCommand;
pub use delete_supplier_contact_command::DeleteSupplierContactCommand;
pub use update_supplier_command::UpdateSupplierCommand;
pub use update_supplier_contact_command::UpdateSupplierContactCommand;
