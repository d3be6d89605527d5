use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::info;

use stailist_common::models::{
    ClothingCategory, ClothingItem, Fit, GraphicSize, NewClothingItem, UserProfile,
};
use stailist_core::portability::{read_import_file, write_export};
use stailist_core::stats::wardrobe_stats;
use stailist_core::{Error, WardrobeStore};

use super::{load_image, load_profile_photo, parse_category, parse_design, parse_fit, with_notice};
use crate::config::AppConfig;

#[derive(clap::Args, Debug, Clone, Default)]
pub struct AddArgs {
    #[arg(long)]
    pub title: Option<String>,

    /// Hoodie, T-Shirt, Jacket, Sweater, Pants, Shorts, Dress, Shoes or Other
    #[arg(long = "type", value_parser = parse_category)]
    pub category: Option<ClothingCategory>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub fabric: Option<String>,

    #[arg(long, value_parser = parse_fit)]
    pub fit: Option<Fit>,

    #[arg(long, value_parser = parse_design)]
    pub design: Option<GraphicSize>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Ask the stylist to fill in details from this description
    #[arg(long, conflicts_with = "photo")]
    pub describe: Option<String>,

    /// Ask the stylist to fill in details from this photo
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

impl AddArgs {
    fn wants_autofill(&self) -> bool {
        self.describe.is_some() || self.photo.is_some()
    }

    /// Flags typed by the user are applied on top of the form, and so win over autofill.
    fn apply_to(&self, form: &mut NewClothingItem) {
        if let Some(title) = &self.title {
            form.title = title.clone();
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(color) = &self.color {
            form.color = color.clone();
        }
        if let Some(fabric) = &self.fabric {
            form.fabric = fabric.clone();
        }
        if let Some(fit) = self.fit {
            form.fit = fit;
        }
        if let Some(design) = self.design {
            form.design = Some(design);
        }
        if self.brand.is_some() {
            form.brand = self.brand.clone();
        }
        if self.image_url.is_some() {
            form.image_url = self.image_url.clone();
        }
        if self.notes.is_some() {
            form.notes = self.notes.clone();
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Print the current profile
    Show,

    /// Update profile fields; fields not given keep their value, "" clears one
    Set {
        #[arg(long)]
        height: Option<String>,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Free text, e.g. "minimal streetwear, earth tones"
        #[arg(long)]
        style: Option<String>,
        /// Photo of you, used for virtual try-on
        #[arg(long)]
        photo: Option<PathBuf>,
    },
}

pub fn item_line(item: &ClothingItem) -> String {
    let mut line = format!(
        "{}  {} ({}, {}, {}, {})",
        item.id,
        item.display_name(),
        item.category,
        item.color,
        item.fabric,
        item.fit
    );
    if let Some(brand) = &item.brand {
        line.push_str(&format!(" by {}", brand));
    }
    if let Some(design) = item.design.filter(|d| *d != GraphicSize::None) {
        line.push_str(&format!(" [{}]", design));
    }
    line
}

pub fn list(store: &WardrobeStore) -> String {
    if store.items().is_empty() {
        return "Your wardrobe is empty. Add something with `stailist add`.".to_string();
    }
    let mut out = format!("{} item(s):", store.items().len());
    for item in store.items() {
        out.push('\n');
        out.push_str(&item_line(item));
    }
    out
}

pub async fn add(args: AddArgs, config: &AppConfig, store: &mut WardrobeStore) -> Result<String, Error> {
    let mut form = NewClothingItem::default();

    if args.wants_autofill() {
        let stylist = config.stylist().await?;
        let draft = match (&args.describe, &args.photo) {
            (Some(query), _) => stylist.autofill_from_text(query).await?,
            (None, Some(path)) => stylist.autofill_from_image(load_image(path).await?).await?,
            (None, None) => Default::default(),
        };
        if draft.is_empty() {
            info!("Autofill returned nothing usable");
        }
        form.apply_draft(&draft);
    }
    args.apply_to(&mut form);

    let added = store.add_item(form).await?;
    Ok(with_notice(format!("Added {}", item_line(&added.value)), &added))
}

pub async fn remove(item_id: &str, store: &mut WardrobeStore) -> String {
    let removed = store.remove_item(item_id).await;
    let message = if removed.value {
        format!("Removed {}", item_id)
    } else {
        format!("No item with id {}; nothing changed", item_id)
    };
    with_notice(message, &removed)
}

fn profile_lines(profile: &UserProfile) -> String {
    let field = |value: &Option<String>| UserProfile::known(value).unwrap_or("-").to_string();
    format!(
        "Height: {}\nWeight: {}\nAge: {}\nGender: {}\nLocation: {}\nStyle: {}\nPhoto: {}",
        field(&profile.height),
        field(&profile.weight),
        field(&profile.age),
        field(&profile.gender),
        field(&profile.location),
        field(&profile.style_description),
        if UserProfile::known(&profile.photo).is_some() { "set" } else { "-" },
    )
}

fn merge_field(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        let value = value.trim().to_string();
        *target = (!value.is_empty()).then_some(value);
    }
}

pub async fn profile(cmd: ProfileCommand, store: &mut WardrobeStore) -> Result<String, Error> {
    match cmd {
        ProfileCommand::Show => Ok(profile_lines(store.profile())),
        ProfileCommand::Set {
            height,
            weight,
            age,
            gender,
            location,
            style,
            photo,
        } => {
            let mut profile = store.profile().clone();
            merge_field(&mut profile.height, height);
            merge_field(&mut profile.weight, weight);
            merge_field(&mut profile.age, age);
            merge_field(&mut profile.gender, gender);
            merge_field(&mut profile.location, location);
            merge_field(&mut profile.style_description, style);
            if let Some(path) = photo {
                profile.photo = Some(load_profile_photo(&path).await?.to_data_url());
            }

            let updated = store.update_profile(profile).await;
            Ok(with_notice(
                format!("Profile saved.\n{}", profile_lines(&updated.value)),
                &updated,
            ))
        }
    }
}

pub async fn export(path: &Path, store: &WardrobeStore) -> Result<String, Error> {
    write_export(path, store.state()).await?;
    Ok(format!(
        "Exported {} item(s) to {}",
        store.items().len(),
        path.display()
    ))
}

pub async fn import(path: &Path, store: &mut WardrobeStore) -> Result<String, Error> {
    let raw = read_import_file(path).await?;
    let imported = store.import_json(&raw).await?;
    let mut message = format!("Imported {} item(s)", imported.value.items_imported);
    if imported.value.profile_updated {
        message.push_str(" and your profile");
    }
    Ok(with_notice(message, &imported))
}

pub fn stats(store: &WardrobeStore) -> String {
    let stats = wardrobe_stats(store.items());
    let counts = |map: &std::collections::BTreeMap<String, usize>| {
        if map.is_empty() {
            return "-".to_string();
        }
        map.iter()
            .map(|(k, v)| format!("{} {}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = format!(
        "Items: {}\nBy type: {}\nBy color: {}\nBy fit: {}\nCompleteness: {:.0}%",
        stats.total_items,
        counts(&stats.by_category),
        counts(&stats.by_color),
        counts(&stats.by_fit),
        stats.completeness * 100.0
    );
    for tip in &stats.recommendations {
        out.push_str(&format!("\n- {}", tip));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_autofill_draft() {
        let mut form = NewClothingItem {
            title: "Nike Tech Fleece".into(),
            color: "Grey".into(),
            ..Default::default()
        };
        let args = AddArgs {
            color: Some("Black".into()),
            fit: Some(Fit::Tight),
            ..Default::default()
        };
        args.apply_to(&mut form);
        assert_eq!(form.title, "Nike Tech Fleece");
        assert_eq!(form.color, "Black");
        assert_eq!(form.fit, Fit::Tight);
    }

    #[test]
    fn test_merge_field_clears_on_blank() {
        let mut value = Some("180cm".to_string());
        merge_field(&mut value, None);
        assert_eq!(value.as_deref(), Some("180cm"));
        merge_field(&mut value, Some("  ".into()));
        assert_eq!(value, None);
    }
}
