//! # Section Schema Registry
//!
//! Static declaration of which sections each logical page supports, in the
//! order editors list them, and how each section's content is stored.
//!
//! The registry is the authority for:
//! - the admin-facing title of a section (written on every save),
//! - the [`ContentShape`] the codec applies to a section,
//! - the public route of a page and the entity lists it shows.
//!
//! Unknown page keys resolve to an empty section list; unknown sections of a
//! known page have no spec and fall back to plain text in the codec.
//!
//! | Page | Route | Structured sections |
//! |------|-------|---------------------|
//! | `home` | `/` | - |
//! | `about` | `/hakkimizda` | `values`, `approach`, `team` |
//! | `teachers` | `/ogretmenlerimiz` | - |
//! | `pricing` | `/fiyat-bilgileri` | `payment`, `faq` |
//! | `menu` | `/yemek-menusu` | `nutrition` |
//! | `events` | `/etkinlikler` | - |
//! | `gallery` | `/galeri` | - |
//! | `contact` | `/iletisim` | - |

use crate::content::ContentShape;
use crate::entities::EntityKind;
use crate::error::{Result, SiteError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKey {
    Home,
    About,
    Teachers,
    Pricing,
    Menu,
    Events,
    Gallery,
    Contact,
}

impl PageKey {
    pub fn all() -> &'static [PageKey] {
        &[
            PageKey::Home,
            PageKey::About,
            PageKey::Teachers,
            PageKey::Pricing,
            PageKey::Menu,
            PageKey::Events,
            PageKey::Gallery,
            PageKey::Contact,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageKey::Home => "home",
            PageKey::About => "about",
            PageKey::Teachers => "teachers",
            PageKey::Pricing => "pricing",
            PageKey::Menu => "menu",
            PageKey::Events => "events",
            PageKey::Gallery => "gallery",
            PageKey::Contact => "contact",
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            PageKey::Home => "/",
            PageKey::About => "/hakkimizda",
            PageKey::Teachers => "/ogretmenlerimiz",
            PageKey::Pricing => "/fiyat-bilgileri",
            PageKey::Menu => "/yemek-menusu",
            PageKey::Events => "/etkinlikler",
            PageKey::Gallery => "/galeri",
            PageKey::Contact => "/iletisim",
        }
    }

    /// Human title used when a page has no stored meta title.
    pub fn title(self) -> &'static str {
        match self {
            PageKey::Home => "Ana Sayfa",
            PageKey::About => "Hakkımızda",
            PageKey::Teachers => "Öğretmenlerimiz",
            PageKey::Pricing => "Fiyat Bilgileri",
            PageKey::Menu => "Yemek Menüsü",
            PageKey::Events => "Etkinlikler",
            PageKey::Gallery => "Galeri",
            PageKey::Contact => "İletişim",
        }
    }
}

impl std::fmt::Display for PageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKey {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        PageKey::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| SiteError::Api(format!("Unknown page \"{}\"", s)))
    }
}

/// Resolves a public URL path to its page. Trailing slashes are ignored.
pub fn page_for_route(route: &str) -> Option<PageKey> {
    let trimmed = route.trim();
    let normalized = match trimmed.trim_end_matches('/') {
        "" => "/",
        path => path,
    };
    PageKey::all()
        .iter()
        .copied()
        .find(|p| p.route() == normalized)
}

/// One section a page supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub shape: ContentShape,
}

const fn spec(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    shape: ContentShape,
) -> SectionSpec {
    SectionSpec {
        id,
        title,
        description,
        shape,
    }
}

const HOME: &[SectionSpec] = &[
    spec(
        "hero",
        "Karşılama",
        "Ana sayfanın üst bölümündeki başlık metni ve görsel",
        ContentShape::PlainText,
    ),
    spec(
        "welcome",
        "Hoş Geldiniz",
        "Okulu tanıtan zengin metin bloğu",
        ContentShape::Html,
    ),
    spec(
        "cta",
        "Kayıt Çağrısı",
        "Kayıt butonu ile birlikte gösterilen kısa metin",
        ContentShape::PlainText,
    ),
];

const ABOUT: &[SectionSpec] = &[
    spec(
        "hero",
        "Hakkımızda Başlığı",
        "Sayfa başlığı altında gösterilen kısa açıklama",
        ContentShape::PlainText,
    ),
    spec(
        "history",
        "Tarihçemiz",
        "Okulun hikayesi, zengin metin",
        ContentShape::Html,
    ),
    spec(
        "mission",
        "Misyonumuz",
        "Misyon metni, zengin metin",
        ContentShape::Html,
    ),
    spec(
        "vision",
        "Vizyonumuz",
        "Vizyon metni, zengin metin",
        ContentShape::Html,
    ),
    spec(
        "values",
        "Değerlerimiz",
        "Başlık, açıklama ve ikon adından oluşan değer kartları",
        ContentShape::ValueCards,
    ),
    spec(
        "approach",
        "Eğitim Yaklaşımımız",
        "Başlık, açıklama ve ikon adından oluşan yaklaşım kartları",
        ContentShape::ApproachCards,
    ),
    spec(
        "team",
        "Ekibimiz",
        "Yönetim ekibi: ad, unvan, açıklama, fotoğraf ve baş harfler",
        ContentShape::Team,
    ),
];

const TEACHERS: &[SectionSpec] = &[
    spec(
        "hero",
        "Öğretmenlerimiz Başlığı",
        "Öğretmen listesinin üstündeki kısa açıklama",
        ContentShape::PlainText,
    ),
    spec(
        "intro",
        "Kadromuz",
        "Eğitim kadrosunu tanıtan zengin metin",
        ContentShape::Html,
    ),
];

const PRICING: &[SectionSpec] = &[
    spec(
        "hero",
        "Fiyat Bilgileri Başlığı",
        "Ücret tablosunun üstündeki kısa açıklama",
        ContentShape::PlainText,
    ),
    spec(
        "intro",
        "Ücretlere Dahil Olanlar",
        "Ücret politikasını anlatan zengin metin",
        ContentShape::Html,
    ),
    spec(
        "payment",
        "Ödeme Seçenekleri",
        "Başlık, açıklama ve SVG ikon yolundan oluşan ödeme kartları",
        ContentShape::PaymentOptions,
    ),
    spec(
        "faq",
        "Sıkça Sorulan Sorular",
        "Soru ve cevap çiftleri",
        ContentShape::Faq,
    ),
];

const MENU: &[SectionSpec] = &[
    spec(
        "hero",
        "Yemek Menüsü Başlığı",
        "Menü sayfasının üstündeki kısa açıklama",
        ContentShape::PlainText,
    ),
    spec(
        "intro",
        "Beslenme Anlayışımız",
        "Beslenme politikasını anlatan zengin metin",
        ContentShape::Html,
    ),
    spec(
        "nutrition",
        "Beslenme İlkeleri",
        "Madde işaretli liste, maddeler | ile ayrılır",
        ContentShape::Bullets,
    ),
];

const EVENTS: &[SectionSpec] = &[
    spec(
        "hero",
        "Etkinlikler Başlığı",
        "Etkinlik listesinin üstündeki kısa açıklama",
        ContentShape::PlainText,
    ),
    spec(
        "intro",
        "Etkinlik Takvimi",
        "Etkinlik anlayışını anlatan zengin metin",
        ContentShape::Html,
    ),
];

const GALLERY: &[SectionSpec] = &[spec(
    "hero",
    "Galeri Başlığı",
    "Galerinin üstündeki kısa açıklama",
    ContentShape::PlainText,
)];

const CONTACT: &[SectionSpec] = &[
    spec(
        "hero",
        "İletişim Başlığı",
        "İletişim formunun üstündeki kısa açıklama",
        ContentShape::PlainText,
    ),
    spec(
        "info",
        "İletişim Bilgileri",
        "Adres, telefon ve e-posta, zengin metin",
        ContentShape::Html,
    ),
    spec(
        "map",
        "Harita",
        "Harita gömme adresi",
        ContentShape::PlainText,
    ),
];

/// Ordered sections of a page.
pub fn sections_for(page: PageKey) -> &'static [SectionSpec] {
    match page {
        PageKey::Home => HOME,
        PageKey::About => ABOUT,
        PageKey::Teachers => TEACHERS,
        PageKey::Pricing => PRICING,
        PageKey::Menu => MENU,
        PageKey::Events => EVENTS,
        PageKey::Gallery => GALLERY,
        PageKey::Contact => CONTACT,
    }
}

/// String-keyed lookup; unknown pages have no sections.
pub fn sections_for_key(page: &str) -> &'static [SectionSpec] {
    page.parse::<PageKey>()
        .map(sections_for)
        .unwrap_or_default()
}

pub fn section_spec(page: PageKey, section_id: &str) -> Option<&'static SectionSpec> {
    sections_for(page).iter().find(|s| s.id == section_id)
}

/// Like [`section_spec`], but an unknown section is an input error.
pub fn require_section(page: PageKey, section_id: &str) -> Result<&'static SectionSpec> {
    section_spec(page, section_id).ok_or_else(|| {
        SiteError::Api(format!(
            "Page \"{}\" has no section \"{}\"",
            page, section_id
        ))
    })
}

/// Entity lists shown on a page, in display order.
pub fn collections_for(page: PageKey) -> &'static [EntityKind] {
    match page {
        PageKey::Home => &[EntityKind::Slider, EntityKind::Announcement],
        PageKey::About => &[EntityKind::Achievement],
        PageKey::Teachers => &[EntityKind::Teacher],
        PageKey::Pricing => &[EntityKind::PricingTier],
        PageKey::Menu => &[EntityKind::MenuItem],
        PageKey::Events => &[EntityKind::Event],
        PageKey::Gallery => &[EntityKind::GalleryItem],
        PageKey::Contact => &[],
    }
}
