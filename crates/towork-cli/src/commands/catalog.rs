use super::utils::{Shown, notice, success, title};
use anyhow::Result;
use colored::Colorize;
use towork_application::AppContext;
use towork_application::view_model::CatalogViewModel;
use towork_core::catalog::{Domaine, DomaineDraft};

pub async fn list(context: &AppContext, page: u32) -> Result<()> {
    let mut catalog = CatalogViewModel::from_context(context);
    let loaded = catalog.go_to_page(page).await;
    let error = catalog
        .domaines
        .error
        .clone()
        .or_else(|| catalog.competences.error.clone());
    loaded.shown(&error)?;

    title(&format!(
        "Domaines (page {}, {} au total)",
        catalog.page.page + 1,
        catalog.total_domaines
    ));
    print_domaines(&catalog.domaines.items);

    for domaine in &catalog.domaines.items {
        let competences = catalog.competences_of(domaine.id);
        if competences.is_empty() {
            continue;
        }
        println!("  {}", domaine.name.bold());
        for competence in competences {
            let certified = if competence.is_certified {
                format!(" ✓ {}", competence.certification_name.as_deref().unwrap_or("certifiée"))
                    .green()
                    .to_string()
            } else {
                String::new()
            };
            println!(
                "    #{:<5} {} {}{}",
                competence.id,
                competence.name,
                competence.level.as_deref().unwrap_or("").bright_black(),
                certified
            );
        }
    }
    Ok(())
}

/// Domains offered in the mission form.
pub async fn active(context: &AppContext) -> Result<()> {
    let mut catalog = CatalogViewModel::from_context(context);
    catalog.load_active().await.shown(&catalog.domaines.error)?;
    title("Domaines actifs");
    print_domaines(&catalog.domaines.items);
    Ok(())
}

pub async fn search(context: &AppContext, keyword: &str) -> Result<()> {
    let mut catalog = CatalogViewModel::from_context(context);
    catalog.search(keyword).await.shown(&catalog.domaines.error)?;
    print_domaines(&catalog.domaines.items);
    Ok(())
}

pub async fn create(context: &AppContext, name: &str, description: Option<String>) -> Result<()> {
    let mut catalog = CatalogViewModel::from_context(context);
    let draft = DomaineDraft {
        description,
        ..DomaineDraft::new(name.trim())
    };
    catalog
        .create_domaine(&draft)
        .await
        .shown(&catalog.domaines.error)?;
    success(&format!("Domaine « {} » créé.", draft.name));
    Ok(())
}

/// Activates an inactive domain and the other way round.
pub async fn toggle(context: &AppContext, id: i64) -> Result<()> {
    let mut catalog = CatalogViewModel::from_context(context);
    let current = context.api().domaines.get(id).await?;
    catalog.domaines.upsert(current);
    catalog.toggle_domaine(id).await.shown(&catalog.domaines.error)?;
    match catalog.domaines.find(id) {
        Some(domaine) => success(&format!("{} : {}", domaine.name, domaine.status_label())),
        None => success("Domaine mis à jour."),
    }
    Ok(())
}

pub async fn delete(context: &AppContext, id: i64) -> Result<()> {
    let mut catalog = CatalogViewModel::from_context(context);
    let message = catalog
        .delete_domaine(id)
        .await
        .shown(&catalog.domaines.error)?;
    success(&message);
    Ok(())
}

pub async fn certify(context: &AppContext, id: i64, certification: &str) -> Result<()> {
    let mut catalog = CatalogViewModel::from_context(context);
    catalog
        .certify_competence(id, certification)
        .await
        .shown(&catalog.competences.error)?;
    success(&format!("Compétence #{id} certifiée : {}", certification.trim()));
    Ok(())
}

fn print_domaines(domaines: &[Domaine]) {
    if domaines.is_empty() {
        notice("Aucun domaine.");
        return;
    }
    for domaine in domaines {
        let status = if domaine.is_active {
            domaine.status_label().green()
        } else {
            domaine.status_label().bright_black()
        };
        println!(
            "  #{:<5} {:<30} {} {}",
            domaine.id,
            domaine.name,
            status,
            domaine.description.as_deref().unwrap_or("").bright_black()
        );
    }
}
