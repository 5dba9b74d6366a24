use crate::view::price_label;
use pitchside_api::{Identified, Stadium};

const GRID_AMENITIES: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardLayout {
    #[default]
    Grid,
    List,
}

impl CardLayout {
    pub fn toggled(self) -> Self {
        match self {
            CardLayout::Grid => CardLayout::List,
            CardLayout::List => CardLayout::Grid,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StadiumCard {
    pub id: Option<String>,
    pub name: String,
    pub address: String,
    pub price_label: String,
    pub rating_label: String,
    pub surface: String,
    pub amenities: Vec<String>,
    /// Amenities left off a compact grid card.
    pub more_amenities: usize,
    pub image: Option<String>,
    pub open_slots: usize,
    pub layout: CardLayout,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlotView {
    pub label: String,
    /// Unavailable slots are shown but cannot be picked.
    pub available: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StadiumDetailView {
    pub card: StadiumCard,
    pub coordinates: String,
    pub slots: Vec<TimeSlotView>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub selected: bool,
}

/// Case-insensitive substring match over name and address. An empty query
/// keeps everything.
pub fn filter_stadiums<'a>(stadiums: &'a [Stadium], query: &str) -> Vec<&'a Stadium> {
    let needle = query.trim().to_lowercase();
    stadiums
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.name.to_lowercase().contains(&needle)
                || s.address.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn render_stadium_card(stadium: &Stadium, layout: CardLayout, selected: bool) -> StadiumCard {
    let (amenities, more_amenities) = match layout {
        CardLayout::Grid if stadium.amenities.len() > GRID_AMENITIES => (
            stadium.amenities[..GRID_AMENITIES].to_vec(),
            stadium.amenities.len() - GRID_AMENITIES,
        ),
        _ => (stadium.amenities.clone(), 0),
    };
    StadiumCard {
        id: stadium.key().map(ToString::to_string),
        name: stadium.name.clone(),
        address: stadium.address.clone(),
        price_label: price_label(stadium.price_per_hour, Some("hr")),
        rating_label: format!("★ {:.1}", stadium.rating),
        surface: if stadium.surface.is_empty() { "Unknown surface".to_string() } else { stadium.surface.clone() },
        amenities,
        more_amenities,
        image: stadium.images.first().cloned(),
        open_slots: stadium.available_slots().count(),
        layout,
        selected,
    }
}

pub fn render_stadium_cards(stadiums: &[&Stadium], layout: CardLayout, selected: Option<usize>) -> Vec<StadiumCard> {
    stadiums
        .iter()
        .enumerate()
        .map(|(i, s)| render_stadium_card(s, layout, selected == Some(i)))
        .collect()
}

pub fn render_time_slots(stadium: &Stadium, selected: Option<&str>) -> Vec<TimeSlotView> {
    stadium
        .slots
        .iter()
        .map(|slot| TimeSlotView {
            label: slot.clone(),
            available: stadium.is_slot_available(slot),
            selected: selected == Some(slot.as_str()),
        })
        .collect()
}

pub fn render_stadium_detail(stadium: &Stadium, selected_slot: Option<&str>) -> StadiumDetailView {
    StadiumDetailView {
        card: render_stadium_card(stadium, CardLayout::List, false),
        coordinates: format!("{:.4}, {:.4}", stadium.lat, stadium.lng),
        slots: render_time_slots(stadium, selected_slot),
        images: stadium.images.clone(),
    }
}

pub fn render_map_markers(stadiums: &[Stadium], selected: Option<usize>) -> Vec<MapMarker> {
    stadiums
        .iter()
        .enumerate()
        .map(|(i, s)| MapMarker {
            x: s.lng,
            y: s.lat,
            label: s.name.clone(),
            selected: selected == Some(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stadium(name: &str, address: &str) -> Stadium {
        Stadium {
            id: Some(name.to_lowercase()),
            name: name.into(),
            address: address.into(),
            price_per_hour: 60,
            rating: 4.4,
            amenities: vec!["lights".into(), "parking".into(), "showers".into(), "cafe".into()],
            slots: vec!["09:00".into(), "11:00".into()],
            unavailable_slots: vec!["09:00".into()],
            ..Stadium::default()
        }
    }

    #[test]
    fn filter_matches_name_or_address_case_insensitively() {
        let all = vec![stadium("Riverside", "12 Mill Lane"), stadium("Hilltop", "River Road")];
        let names = |q: &str| filter_stadiums(&all, q).iter().map(|s| s.name.clone()).collect::<Vec<_>>();
        assert_eq!(names("RIVER"), vec!["Riverside", "Hilltop"]);
        assert_eq!(names("mill"), vec!["Riverside"]);
        assert_eq!(names("  "), vec!["Riverside", "Hilltop"]);
        assert!(names("stadium of light").is_empty());
    }

    #[test]
    fn time_slots_mark_unavailable_entries() {
        let s = stadium("Riverside", "");
        let slots = render_time_slots(&s, Some("11:00"));
        assert_eq!(
            slots,
            vec![
                TimeSlotView { label: "09:00".into(), available: false, selected: false },
                TimeSlotView { label: "11:00".into(), available: true, selected: true },
            ]
        );
    }

    #[test]
    fn grid_cards_truncate_amenities_list_cards_do_not() {
        let s = stadium("Riverside", "");
        let grid = render_stadium_card(&s, CardLayout::Grid, false);
        assert_eq!(grid.amenities.len(), 3);
        assert_eq!(grid.more_amenities, 1);
        let list = render_stadium_card(&s, CardLayout::List, true);
        assert_eq!(list.amenities.len(), 4);
        assert_eq!(list.more_amenities, 0);
        assert!(list.selected);
        assert_eq!(list.rating_label, "★ 4.4");
        assert_eq!(list.open_slots, 1);
    }

    #[test]
    fn rendering_is_repeatable() {
        let s = [stadium("Riverside", "")];
        let refs: Vec<&Stadium> = s.iter().collect();
        assert_eq!(
            render_stadium_cards(&refs, CardLayout::Grid, Some(0)),
            render_stadium_cards(&refs, CardLayout::Grid, Some(0))
        );
    }
}
