pub use interop_service::InteropService;
pub use invocation_script::InvocationScript;
pub use script_builder::ScriptBuilder;
pub use verification_script::VerificationScript;

mod interop_service;
mod invocation_script;
mod script_builder;
mod verification_script;
