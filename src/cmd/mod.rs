/*!
Command dispatcher module.

  src/cmd/
    mod.rs      (this file: module declarations + re-exports)
    serve.rs    (ServeArgs + execute_serve)
    list.rs     (ListArgs  + execute_list)
    exec.rs     (ExecArgs  + execute_exec)
    shared.rs   (parameter parsing / schema coercion helpers)

Conventions:
  - Each subcommand module exposes exactly one public `execute_*` function
    taking its args plus the resolved `ServerConfig` and returning
    `anyhow::Result<()>`.
  - Argument structs derive `clap::Args` and are kept minimal.
*/

pub mod exec;
pub mod list;
pub mod serve;
pub mod shared;

pub use exec::{ExecArgs, execute_exec};
pub use list::{ListArgs, execute_list};
pub use serve::{ServeArgs, execute_serve};
