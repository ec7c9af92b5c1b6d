//! `stencil show` command.

use crate::error::Result;
use crate::store::TemplateStore;
use crate::template::Template;

/// Execute the `show` command.
///
/// # Errors
///
/// Returns an error if the identifier does not resolve or loading fails.
pub fn run(store: &TemplateStore<'_>, identifier: &str) -> Result<()> {
    let template = store.get(identifier)?;
    print_template(&template);
    Ok(())
}

fn print_template(template: &Template) {
    println!("Template: {}@{}", template.name, template.version);
    println!("Id: {}", template.id);
    if !template.aliases.is_empty() {
        println!("Aliases: {}", template.aliases.join(", "));
    }
    if !template.description.is_empty() {
        println!("Description: {}", template.description);
    }
    println!("Root folder: {}", template.root_folder);

    if !template.folders.is_empty() {
        println!("\nFolders:");
        for folder in &template.folders {
            println!("  {folder}/");
        }
    }
    if !template.files.is_empty() {
        println!("\nFiles:");
        for file in &template.files {
            let origin = match (&file.content, &file.source_path) {
                (Some(_), _) => "inline".to_string(),
                (None, Some(source)) => format!("from files/{source}"),
                (None, None) => "empty".to_string(),
            };
            println!("  {} ({origin})", file.path);
        }
    }
    if !template.variables.is_empty() {
        println!("\nVariables:");
        for variable in &template.variables {
            let required = if variable.required { " (required)" } else { "" };
            match &variable.default {
                Some(default) => println!("  {} = {default}{required}", variable.name),
                None => println!("  {}{required}", variable.name),
            }
        }
    }
    if !template.dependencies.is_empty() {
        println!("\nDependencies:");
        for dependency in &template.dependencies {
            println!("  {dependency}");
        }
    }
    println!("\nCreated: {}", template.created.to_rfc3339());
    println!("Updated: {}", template.updated.to_rfc3339());
}
