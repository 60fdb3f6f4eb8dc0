//! Metadata subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use cuba_rest::model::rust_type_for;

use crate::cli::ConnectionArgs;
use crate::commands::connect;
use crate::output;

#[derive(Args, Debug)]
pub struct MetadataCommand {
    #[command(subcommand)]
    pub command: MetadataSubcommand,

    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum MetadataSubcommand {
    /// List entity types
    Entities {
        /// Keep only names starting with this prefix, e.g. sec$
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Describe one entity type
    Entity {
        /// Entity metaclass, e.g. sec$User
        metaclass: String,
    },

    /// List the views declared for an entity type
    Views {
        /// Entity metaclass, e.g. sec$User
        metaclass: String,
    },

    /// List enums
    Enums {
        /// Keep only names starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Describe one enum
    Enum {
        /// Fully-qualified enum name
        name: String,
    },

    /// List built-in datatypes
    Datatypes,
}

pub async fn handle(connection: &ConnectionArgs, cmd: MetadataCommand) -> Result<()> {
    let client = connect(connection)?;
    let json = cmd.json;

    match cmd.command {
        MetadataSubcommand::Entities { prefix } => {
            let types = client
                .list_types(prefix.as_deref())
                .await
                .context("Failed to list entity types")?;
            if json {
                return output::json_pretty(&types);
            }
            for entity in &types {
                println!("{}", entity.entity_name);
            }
        }
        MetadataSubcommand::Entity { metaclass } => {
            let entity = client
                .get_type_metadata(&metaclass)
                .await
                .context("Failed to get entity metadata")?;
            if json {
                return output::json_pretty(&entity);
            }
            println!("{}", entity.entity_name.bold());
            for property in &entity.properties {
                let mut flags = Vec::new();
                if property.mandatory {
                    flags.push("mandatory");
                }
                if property.read_only {
                    flags.push("read-only");
                }
                if property.transient {
                    flags.push("transient");
                }
                let value = format!(
                    "{} {:?} {}",
                    property.type_name,
                    property.cardinality,
                    flags.join(",")
                );
                output::field(&format!("  {}", property.name), value.trim_end());
            }
        }
        MetadataSubcommand::Views { metaclass } => {
            let views = client
                .list_entity_views(&metaclass)
                .await
                .context("Failed to list views")?;
            if json {
                return output::json_pretty(&views);
            }
            for view in &views {
                println!("{}", view.name);
            }
        }
        MetadataSubcommand::Enums { prefix } => {
            let enums = client
                .list_enums(prefix.as_deref())
                .await
                .context("Failed to list enums")?;
            if json {
                return output::json_pretty(&enums);
            }
            for enum_type in &enums {
                println!("{}", enum_type.name);
            }
        }
        MetadataSubcommand::Enum { name } => {
            let enum_type = client
                .get_enum_metadata(&name)
                .await
                .context("Failed to get enum metadata")?;
            if json {
                return output::json_pretty(&enum_type);
            }
            println!("{}", enum_type.name.bold());
            for value in &enum_type.values {
                output::field(&format!("  {}", value.id), &value.to_string());
            }
        }
        MetadataSubcommand::Datatypes => {
            let datatypes = client
                .list_datatypes()
                .await
                .context("Failed to list datatypes")?;
            if json {
                return output::json_pretty(&datatypes);
            }
            for id in &datatypes {
                output::field(id, rust_type_for(id).unwrap_or("-"));
            }
        }
    }

    Ok(())
}
