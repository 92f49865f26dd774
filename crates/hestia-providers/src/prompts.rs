//! Prompt templates for image generation and captions.

use hestia_core::models::{CaptionLocale, EnhancementType, Intensity, StyleParams};

fn enhancement_prompt(enhancement: EnhancementType) -> &'static str {
    match enhancement {
        EnhancementType::Professional => {
            "Enhance this property image to make it look more professional for real estate marketing. Improve lighting, colors, and overall appeal while keeping it realistic."
        }
        EnhancementType::Brightness => {
            "Improve the brightness and lighting of this property image to make it more appealing."
        }
        EnhancementType::Contrast => "Enhance the contrast and clarity of this property image.",
        EnhancementType::Color => {
            "Improve the color balance and saturation of this property image to make it more vibrant and appealing."
        }
    }
}

fn intensity_direction(intensity: Intensity) -> &'static str {
    match intensity {
        Intensity::Subtle => {
            "Apply subtle styling and lighting improvements while keeping layout and most furniture recognizable."
        }
        Intensity::Balanced => {
            "Apply a clear restyle with updated furniture and lighting while preserving realism and spatial layout."
        }
        Intensity::Bold => {
            "Strong restyle with distinct furniture and decor while preserving architecture and camera; do not change walls/windows or geometry."
        }
    }
}

/// Build the generation prompt. A theme selects the redesign template.
pub fn image_prompt(params: &StyleParams) -> String {
    let Some(theme) = params.theme else {
        let mut prompt = enhancement_prompt(params.enhancement).to_string();
        if let Some(intensity) = params.intensity {
            prompt.push_str(&format!(" Keep the adjustment {}.", intensity.as_str()));
        }
        return prompt;
    };

    let intensity = params.intensity.unwrap_or_default();
    let seed = params
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "auto".to_string());

    let mut prompt = format!(
        "You are an expert interior CGI renderer for real-estate listings.
Redesign this {room} in a {theme} style.

Strict constraints:
- Preserve architectural structure (walls, windows, doors, ceiling height, flooring pattern if visible).
- Keep camera angle, perspective and geometry consistent with the original.

Creative direction ({intensity}): {direction}
Use bright, clean lighting (soft global illumination), low noise, realistic materials.
Stage cohesive furniture/decor/colors consistent with {theme}. Remove clutter and artifacts.
Variation seed: {seed} (produce a distinct variation).
Avoid text overlays, watermarks or borders.
Output a high-resolution photo. Match or exceed the input resolution without adding borders.
",
        room = params.room.label(),
        theme = theme,
        intensity = intensity.as_str(),
        direction = intensity_direction(intensity),
        seed = seed,
    );

    if let Some(brief) = &params.custom_prompt {
        prompt.push_str(&format!("\nUser creative brief: {}", brief));
    }
    prompt
}

pub fn caption_prompt(locale: CaptionLocale, context: &str) -> String {
    match locale {
        CaptionLocale::Fr => format!(
            "Écris une légende courte et percutante en français pour un post immobilier. Garde un ton professionnel et moderne, ajoute 2-3 hashtags pertinents. Contexte: {}",
            context
        ),
        CaptionLocale::En => format!(
            "Write a short, punchy caption in English for a real-estate post. Keep it professional and modern, add 2-3 relevant hashtags. Context: {}",
            context
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_core::models::{DesignTheme, RoomType};

    #[test]
    fn test_enhancement_prompt_without_theme() {
        let prompt = image_prompt(&StyleParams::enhancement(EnhancementType::Contrast));
        assert_eq!(
            prompt,
            "Enhance the contrast and clarity of this property image."
        );
    }

    #[test]
    fn test_redesign_prompt_mentions_room_theme_and_seed() {
        let params = StyleParams::redesign(RoomType::DiningRoom, DesignTheme::Coastal, Intensity::Bold)
            .with_seed(Some(7))
            .with_custom_prompt(Some("Add a large oak table".to_string()));
        let prompt = image_prompt(&params);

        assert!(prompt.contains("Redesign this dining room in a coastal style."));
        assert!(prompt.contains("Creative direction (bold): Strong restyle"));
        assert!(prompt.contains("Variation seed: 7 (produce a distinct variation)."));
        assert!(prompt.ends_with("User creative brief: Add a large oak table"));
    }

    #[test]
    fn test_redesign_prompt_without_seed_is_auto() {
        let params = StyleParams::redesign(RoomType::Other, DesignTheme::Modern, Intensity::Subtle);
        let prompt = image_prompt(&params);
        assert!(prompt.contains("Redesign this room in a modern style."));
        assert!(prompt.contains("Variation seed: auto"));
        assert!(!prompt.contains("User creative brief"));
    }

    #[test]
    fn test_caption_prompt_locales() {
        assert!(caption_prompt(CaptionLocale::En, "3-bed villa").ends_with("Context: 3-bed villa"));
        assert!(caption_prompt(CaptionLocale::Fr, "villa").starts_with("Écris une légende"));
    }
}
