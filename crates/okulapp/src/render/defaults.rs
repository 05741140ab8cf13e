//! Built-in copy shown when a section has no stored content.
//!
//! Every registry section must have an entry here; a test enforces it.

use crate::content::{Card, FaqEntry, SectionContent, TeamMember};
use crate::registry::PageKey;

pub struct SectionDefault {
    pub content: SectionContent,
    pub image: Option<String>,
    pub button: Option<(&'static str, &'static str)>,
}

impl SectionDefault {
    fn text(s: &str) -> Self {
        Self {
            content: SectionContent::PlainText(s.to_string()),
            image: None,
            button: None,
        }
    }

    fn html(s: &str) -> Self {
        Self {
            content: SectionContent::Html(s.to_string()),
            image: None,
            button: None,
        }
    }

    fn of(content: SectionContent) -> Self {
        Self {
            content,
            image: None,
            button: None,
        }
    }

    fn with_image(mut self, path: String) -> Self {
        self.image = Some(path);
        self
    }

    fn with_button(mut self, text: &'static str, url: &'static str) -> Self {
        self.button = Some((text, url));
        self
    }
}

/// Placeholder image for a page's hero.
pub fn hero_image(page: PageKey) -> String {
    format!("/images/hero/{}.jpg", page.as_str())
}

pub fn section_default(page: PageKey, section_id: &str) -> Option<SectionDefault> {
    use PageKey::*;
    let default = match (page, section_id) {
        (Home, "hero") => {
            SectionDefault::text("Çocuğunuz için sevgi dolu, güvenli ve neşeli bir yuva")
                .with_image(hero_image(page))
                .with_button("Bizi Tanıyın", "/hakkimizda")
        }
        (Home, "welcome") => SectionDefault::html(
            "<p>Okulumuzda her çocuk kendi hızında, oyunla ve keşfederek öğrenir.</p>",
        ),
        (Home, "cta") => SectionDefault::text("Yeni dönem kayıtlarımız başladı.")
            .with_button("Bize Ulaşın", "/iletisim"),

        (About, "hero") => {
            SectionDefault::text("Okulumuzu ve eğitim anlayışımızı tanıyın.").with_image(hero_image(page))
        }
        (About, "history") => SectionDefault::html(
            "<p>Okulumuz, çocukların mutlu bir ortamda büyümesi amacıyla kurulmuştur.</p>",
        ),
        (About, "mission") => SectionDefault::html(
            "<p>Her çocuğun potansiyelini sevgi ve saygı ile ortaya çıkarmak.</p>",
        ),
        (About, "vision") => SectionDefault::html(
            "<p>Merakını koruyan, özgüvenli ve mutlu bireyler yetiştirmek.</p>",
        ),
        (About, "values") => SectionDefault::of(SectionContent::Cards(vec![
            Card::new("Sevgi", "Her çocuğa koşulsuz sevgi ile yaklaşırız.", "heart"),
            Card::new("Saygı", "Çocuklarımızın bireyselliğine saygı duyarız.", "handshake"),
            Card::new("Merak", "Soru sormayı ve keşfetmeyi destekleriz.", "lightbulb"),
        ])),
        (About, "approach") => SectionDefault::of(SectionContent::Cards(vec![
            Card::new("Oyunla Öğrenme", "Öğrenmenin en doğal yolu oyundur.", "puzzle"),
            Card::new("Bireysel Gelişim", "Her çocuk kendi hızında ilerler.", "seedling"),
            Card::new("Aile İşbirliği", "Ailelerle sürekli iletişim içindeyiz.", "users"),
        ])),
        (About, "team") => SectionDefault::of(SectionContent::Team(vec![TeamMember::new(
            "Okul Yönetimi",
            "Kurucu",
        )])),

        (Teachers, "hero") => SectionDefault::text("Deneyimli ve sevgi dolu eğitim kadromuz.")
            .with_image(hero_image(page)),
        (Teachers, "intro") => SectionDefault::html(
            "<p>Öğretmenlerimiz alanında uzman ve çocuk gelişimine tutkuyla bağlıdır.</p>",
        ),

        (Pricing, "hero") => SectionDefault::text("Şeffaf ve esnek ücret seçenekleri.")
            .with_image(hero_image(page)),
        (Pricing, "intro") => SectionDefault::html(
            "<p>Ücretlerimize eğitim materyalleri ve öğünler dahildir.</p>",
        ),
        (Pricing, "payment") => SectionDefault::of(SectionContent::Cards(vec![
            Card::new(
                "Peşin Ödeme",
                "Dönem başında tek seferde ödeme.",
                "M3 10h18M7 15h1m4 0h1m-7 4h12a3 3 0 003-3V8a3 3 0 00-3-3H6a3 3 0 00-3 3v8a3 3 0 003 3z",
            ),
            Card::new(
                "Taksitli Ödeme",
                "Kredi kartına taksit imkanı.",
                "M9 7h6m0 10v-3m-3 3h.01M9 17h.01M9 14h.01M12 14h.01M15 11h.01M12 11h.01M9 11h.01M7 21h10a2 2 0 002-2V5a2 2 0 00-2-2H7a2 2 0 00-2 2v14a2 2 0 002 2z",
            ),
            Card::new(
                "Kardeş İndirimi",
                "İkinci çocuk için indirim uygulanır.",
                "M17 20h5v-2a3 3 0 00-5.356-1.857M17 20H7m10 0v-2c0-.656-.126-1.283-.356-1.857M7 20H2v-2a3 3 0 015.356-1.857",
            ),
        ])),
        (Pricing, "faq") => SectionDefault::of(SectionContent::Faq(vec![
            FaqEntry::new(
                "Ücrete neler dahildir?",
                "Eğitim materyalleri, öğünler ve etkinlikler ücrete dahildir.",
            ),
            FaqEntry::new(
                "Kayıt için ne gereklidir?",
                "Kimlik fotokopisi, aşı kartı ve sağlık raporu yeterlidir.",
            ),
        ])),

        (Menu, "hero") => SectionDefault::text("Sağlıklı ve dengeli beslenme programımız.")
            .with_image(hero_image(page)),
        (Menu, "intro") => SectionDefault::html(
            "<p>Menülerimiz diyetisyen kontrolünde, mevsimine uygun hazırlanır.</p>",
        ),
        (Menu, "nutrition") => SectionDefault::of(SectionContent::Bullets(vec![
            "Taze ve mevsiminde sebze meyve".to_string(),
            "Ev yapımı yoğurt".to_string(),
            "Katkı maddesi içermeyen ürünler".to_string(),
        ])),

        (Events, "hero") => SectionDefault::text("Okulumuzda neler oluyor?")
            .with_image(hero_image(page)),
        (Events, "intro") => SectionDefault::html(
            "<p>Gezi, şenlik ve atölyelerle dolu bir takvim sizi bekliyor.</p>",
        ),

        (Gallery, "hero") => SectionDefault::text("Okulumuzdan kareler.")
            .with_image(hero_image(page)),

        (Contact, "hero") => SectionDefault::text("Sorularınız için bize ulaşın.")
            .with_image(hero_image(page)),
        (Contact, "info") => SectionDefault::html(
            "<p>Adres, telefon ve e-posta bilgilerimiz yakında burada olacak.</p>",
        ),
        (Contact, "map") => SectionDefault::text("https://www.google.com/maps/embed"),

        _ => return None,
    };
    Some(default)
}
