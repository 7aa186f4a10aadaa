//! # Registry Response Normalization
//!
//! The registry's SOAP response is deeply nested, namespaced, and not
//! consistent about where contact data lives. This module parses it into a
//! namespace-agnostic [`XmlElement`] tree and maps that tree onto
//! [`CompanyDetails`].
//!
//! Contact fields are resolved from data tables rather than code paths.
//! Sources in increasing priority:
//!
//! 1. synonym fields in the last `kontaktandmed` block,
//! 2. `sidevahendid` channel items, where an item with no end date or an
//!    end date in the future overrides whatever was found before it,
//! 3. synonym fields on the company element itself, for email and phone
//!    only, and only when still missing.

use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use klaar_core::temporal::parse_registry_date;
use klaar_signing::{PersonType, Representative};

use crate::error::ClientError;

/// Field names that may hold an email address.
pub const EMAIL_FIELDS: &[&str] = &["epost", "email", "e_posti_aadress", "e_post", "elektronpost"];
/// Field names that may hold a phone number.
pub const PHONE_FIELDS: &[&str] = &[
    "telefon",
    "tel",
    "telefoninumber",
    "telefoni_number",
    "mob",
    "mobiil",
];
/// Field names that may hold a website.
pub const WEB_FIELDS: &[&str] = &["veebileht", "koduleht", "www", "web", "veeb"];

/// Substrings of a `sidevahendid` channel kind, matched case-insensitively.
const EMAIL_CHANNELS: &[&str] = &["mail", "post"];
const PHONE_CHANNELS: &[&str] = &["tel", "mob", "phone"];
const WEB_CHANNELS: &[&str] = &["veeb", "www", "web", "kodu"];

/// Containers whose `item` children are registry persons.
const PERSON_CONTAINERS: &[&str] = &["kaardile_kantud_isikud", "kaardivalised_isikud"];

/// Role codes that carry the right to sign for the company.
pub const SIGNING_ROLES: &[&str] = &["JUHL", "PROK", "TOSAN", "UOSAN", "LIKV"];

/// Status values meaning the company is entered in the register.
const ACTIVE_STATUSES: &[&str] = &["R", "Registrisse kantud", "Registered"];

// ─── XML tree ────────────────────────────────────────────────────────

/// An XML element with its namespace prefix dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Text directly inside this element.
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    /// Parse a document. The returned element is a synthetic root named
    /// `#document` whose children are the top-level elements.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Xml`] for malformed or truncated input.
    pub fn parse(xml: &str) -> Result<Self, ClientError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack = vec![Self::named(b"#document")];
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(Self::named(e.local_name().as_ref())),
                Ok(Event::Empty(e)) => {
                    let element = Self::named(e.local_name().as_ref());
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(element);
                    }
                }
                Ok(Event::End(_)) => {
                    if stack.len() < 2 {
                        return Err(ClientError::Xml("unbalanced closing tag".into()));
                    }
                    if let Some(element) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(element);
                        }
                    }
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| ClientError::Xml(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(ClientError::Xml(format!(
                        "at byte {}: {e}",
                        reader.buffer_position()
                    )))
                }
            }
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(root), true) => Ok(root),
            _ => Err(ClientError::Xml("document ended inside an element".into())),
        }
    }

    /// All descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant with the given local name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|e| e.name == name)
    }

    /// Last descendant with the given local name.
    pub fn find_last(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().filter(|e| e.name == name).last()
    }

    /// Direct children with the given local name.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |e| e.name == name)
    }

    /// Concatenated text of this element and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Trimmed text of the first descendant named `name`, if non-empty.
    pub fn value(&self, name: &str) -> Option<String> {
        let text = self.find(name)?.text_content();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// First non-empty value among `names`, tried in order.
    pub fn first_value(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|n| self.value(n))
    }
}

/// Pre-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

// ─── Company details ─────────────────────────────────────────────────

/// Normalized company record from a registry detail lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub reg_code: String,
    pub name: String,
    pub vat_number: Option<String>,
    /// Legal form code, e.g. `OU`.
    pub legal_form: String,
    pub legal_form_text: Option<String>,
    /// Registry status code, e.g. `R`.
    pub status: String,
    pub status_text: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub location_code: Option<String>,
    pub location_text: Option<String>,
    pub first_registered: Option<NaiveDate>,
    pub capital: Option<f64>,
    pub capital_currency: Option<String>,
    pub financial_year_start: Option<String>,
    pub financial_year_end: Option<String>,
    pub activity_text: Option<String>,
    /// EMTAK activity codes.
    pub activity_codes: Vec<String>,
    pub persons: Vec<Representative>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl CompanyDetails {
    pub fn is_active(&self) -> bool {
        is_company_active(&self.status)
            || self.status_text.as_deref().is_some_and(is_company_active)
    }

    /// Persons who may sign for the company on `today`.
    pub fn signing_representatives(&self, today: NaiveDate) -> Vec<Representative> {
        signing_representatives(&self.persons, today)
    }
}

/// True for statuses meaning the company is entered in the register.
pub fn is_company_active(status: &str) -> bool {
    ACTIVE_STATUSES.contains(&status.trim())
}

/// Keep persons whose role confers signing authority and whose role has
/// not ended before `today`.
pub fn signing_representatives(
    persons: &[Representative],
    today: NaiveDate,
) -> Vec<Representative> {
    persons
        .iter()
        .filter(|p| p.is_procurator || SIGNING_ROLES.contains(&p.role_code.as_str()))
        .filter(|p| p.is_current(today))
        .cloned()
        .collect()
}

/// Check a parsed response for a SOAP fault or a registry error message.
pub fn registry_fault(root: &XmlElement) -> Option<String> {
    root.value("faultstring").or_else(|| root.value("veateade"))
}

/// Parse and normalize a `detailandmed_v2` response.
///
/// `today` decides which contact channels are still valid.
///
/// # Errors
///
/// - [`ClientError::Xml`] if the body is not well-formed XML.
/// - [`ClientError::Registry`] for a SOAP fault, a registry error message,
///   or a response without a company.
pub fn normalize_company(xml: &str, today: NaiveDate) -> Result<CompanyDetails, ClientError> {
    let root = XmlElement::parse(xml)?;
    if let Some(fault) = registry_fault(&root) {
        return Err(ClientError::Registry(fault));
    }

    let company = root
        .descendants()
        .filter(|e| e.name == "ettevotjad")
        .find_map(|e| e.children_named("item").next())
        .ok_or_else(|| ClientError::Registry("company not found in response".into()))?;

    let general = root.find("yldandmed");
    let general_value = |name: &str| general.and_then(|g| g.value(name));

    let persons = root
        .descendants()
        .filter(|e| PERSON_CONTAINERS.contains(&e.name.as_str()))
        .flat_map(|container| container.children_named("item"))
        .map(person)
        .collect();

    let activity_codes = root
        .descendants()
        .filter(|e| e.name == "emtak_tegevusalad")
        .flat_map(|e| e.children_named("item"))
        .map(|item| item.text_content().trim().to_string())
        .filter(|code| !code.is_empty())
        .collect();

    let contacts = resolve_contacts(&root, company, today);

    Ok(CompanyDetails {
        reg_code: company.value("ariregistri_kood").unwrap_or_default(),
        name: company.value("nimi").unwrap_or_default(),
        vat_number: company.value("kmkr_number"),
        legal_form: general_value("oiguslik_vorm").unwrap_or_default(),
        legal_form_text: general_value("oiguslik_vorm_tekstina"),
        status: general_value("staatus").unwrap_or_default(),
        status_text: general_value("staatus_tekstina"),
        address: company.value("aadress"),
        zip_code: company.value("indeks"),
        location_code: company.value("asukoht_ehak_kood"),
        location_text: company.value("asukoht_ehak_tekstina"),
        first_registered: general_value("esmaregistreerimise_kpv")
            .as_deref()
            .and_then(parse_registry_date),
        capital: company
            .value("kapitali_suurus")
            .and_then(|v| v.replace(',', ".").parse::<f64>().ok())
            .filter(|v| *v != 0.0),
        capital_currency: company.value("kapitali_valuuta"),
        financial_year_start: company.value("majandusaasta_algus"),
        financial_year_end: company.value("majandusaasta_lopp"),
        activity_text: company.value("emtak_tekstina"),
        activity_codes,
        persons,
        email: contacts.email,
        phone: contacts.phone,
        website: contacts.website,
    })
}

fn person(item: &XmlElement) -> Representative {
    let date = |name: &str| item.value(name).as_deref().and_then(parse_registry_date);
    let flag = |name: &str| item.value(name).as_deref() == Some("true");
    Representative {
        person_type: match item.value("isiku_tyyp").as_deref() {
            Some("J") => PersonType::Legal,
            _ => PersonType::Natural,
        },
        first_name: item.value("eesnimi"),
        name: item.first_value(&["nimi_arinimi", "nimi"]).unwrap_or_default(),
        personal_code: item.first_value(&["isikukood_registrikood", "isikukood"]),
        role_code: item.value("isiku_roll").unwrap_or_default(),
        role_text: item.value("isiku_roll_tekstina"),
        start_date: date("algus_kpv"),
        end_date: date("lopp_kpv"),
        is_procurator: flag("on_prokurist"),
        sole_representation: flag("ainuesindus"),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Contacts {
    email: Option<String>,
    phone: Option<String>,
    website: Option<String>,
}

fn resolve_contacts(root: &XmlElement, company: &XmlElement, today: NaiveDate) -> Contacts {
    let mut contacts = Contacts::default();

    if let Some(block) = root.find_last("kontaktandmed") {
        contacts.email = block.first_value(EMAIL_FIELDS);
        contacts.phone = block.first_value(PHONE_FIELDS);
        contacts.website = block.first_value(WEB_FIELDS);
    }

    if let Some(channels) = root.find_last("sidevahendid") {
        for item in channels.descendants().filter(|e| e.name == "item") {
            let kind = item
                .first_value(&["liik", "kirjeldus", "tyyp"])
                .unwrap_or_default()
                .to_lowercase();
            let Some(content) = item.first_value(&["sisu", "vaartus", "value"]) else {
                continue;
            };
            // An unparseable end date counts as expired.
            let valid = match item.value("lopp_kpv") {
                None => true,
                Some(end) => parse_registry_date(&end).is_some_and(|end| end > today),
            };

            let slots = [
                (EMAIL_CHANNELS, &mut contacts.email),
                (PHONE_CHANNELS, &mut contacts.phone),
                (WEB_CHANNELS, &mut contacts.website),
            ];
            for (markers, slot) in slots {
                if markers.iter().any(|m| kind.contains(m)) && (slot.is_none() || valid) {
                    *slot = Some(content.clone());
                }
            }
        }
    }

    if contacts.email.is_none() {
        contacts.email = company.first_value(EMAIL_FIELDS);
    }
    if contacts.phone.is_none() {
        contacts.phone = company.first_value(PHONE_FIELDS);
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
    }

    fn response(company_body: &str, extra: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="http://arireg.x-road.eu/producer/">
  <SOAP-ENV:Body>
    <ns1:detailandmed_v2Response>
      <ns1:keha>
        <ns1:ettevotjad>
          <ns1:item>
            <ns1:ariregistri_kood>12345678</ns1:ariregistri_kood>
            <ns1:nimi>Näidis OÜ</ns1:nimi>
            {company_body}
          </ns1:item>
        </ns1:ettevotjad>
        {extra}
      </ns1:keha>
    </ns1:detailandmed_v2Response>
  </SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#
        )
    }

    // ── XML tree ──

    #[test]
    fn parse_drops_prefixes_and_unescapes() {
        let root = XmlElement::parse("<a:x><a:y>R &amp; D</a:y><z/></a:x>").unwrap();
        let x = &root.children[0];
        assert_eq!(x.name, "x");
        assert_eq!(x.children.len(), 2);
        assert_eq!(root.value("y").as_deref(), Some("R & D"));
        assert!(root.find("z").is_some());
    }

    #[test]
    fn descendants_are_in_document_order() {
        let root = XmlElement::parse("<a><b><c/></b><d/></a>").unwrap();
        let names: Vec<_> = root.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn truncated_document_is_an_error() {
        assert!(matches!(XmlElement::parse("<a><b>"), Err(ClientError::Xml(_))));
    }

    #[test]
    fn empty_value_is_none() {
        let root = XmlElement::parse("<a><b>   </b></a>").unwrap();
        assert_eq!(root.value("b"), None);
    }

    // ── Company ──

    #[test]
    fn normalizes_general_data() {
        let xml = response(
            r#"<ns1:kmkr_number>EE101234567</ns1:kmkr_number>
               <ns1:aadress>Tartu mnt 1</ns1:aadress>
               <ns1:indeks>10115</ns1:indeks>
               <ns1:kapitali_suurus>2500.00</ns1:kapitali_suurus>
               <ns1:kapitali_valuuta>EUR</ns1:kapitali_valuuta>
               <ns1:yldandmed>
                 <ns1:oiguslik_vorm>OU</ns1:oiguslik_vorm>
                 <ns1:oiguslik_vorm_tekstina>Osaühing</ns1:oiguslik_vorm_tekstina>
                 <ns1:staatus>R</ns1:staatus>
                 <ns1:staatus_tekstina>Registrisse kantud</ns1:staatus_tekstina>
                 <ns1:esmaregistreerimise_kpv>2019-05-14Z</ns1:esmaregistreerimise_kpv>
                 <ns1:emtak_tegevusalad>
                   <ns1:item>69201</ns1:item>
                   <ns1:item>62011</ns1:item>
                 </ns1:emtak_tegevusalad>
               </ns1:yldandmed>"#,
            "",
        );
        let details = normalize_company(&xml, today()).unwrap();
        assert_eq!(details.reg_code, "12345678");
        assert_eq!(details.name, "Näidis OÜ");
        assert_eq!(details.vat_number.as_deref(), Some("EE101234567"));
        assert_eq!(details.legal_form, "OU");
        assert_eq!(details.status, "R");
        assert!(details.is_active());
        assert_eq!(details.first_registered, NaiveDate::from_ymd_opt(2019, 5, 14));
        assert_eq!(details.capital, Some(2500.0));
        assert_eq!(details.activity_codes, vec!["69201", "62011"]);
        assert_eq!(details.zip_code.as_deref(), Some("10115"));
    }

    #[test]
    fn fault_and_error_message_are_registry_errors() {
        let fault = r#"<Envelope><Body><Fault><faultcode>Server</faultcode><faultstring>Vale parool</faultstring></Fault></Body></Envelope>"#;
        match normalize_company(fault, today()) {
            Err(ClientError::Registry(msg)) => assert_eq!(msg, "Vale parool"),
            other => panic!("expected registry error, got {other:?}"),
        }
        let veateade = "<a><veateade>Kood puudub</veateade></a>";
        assert!(matches!(normalize_company(veateade, today()), Err(ClientError::Registry(_))));
    }

    #[test]
    fn missing_company_is_registry_error() {
        let xml = "<Envelope><Body><keha><ettevotjad/></keha></Body></Envelope>";
        assert!(matches!(normalize_company(xml, today()), Err(ClientError::Registry(_))));
    }

    // ── Persons ──

    #[test]
    fn persons_are_read_from_both_containers() {
        let xml = response(
            r#"<ns1:isikuandmed>
                 <ns1:kaardile_kantud_isikud>
                   <ns1:item>
                     <ns1:isiku_tyyp>F</ns1:isiku_tyyp>
                     <ns1:isiku_roll>JUHL</ns1:isiku_roll>
                     <ns1:isiku_roll_tekstina>Juhatuse liige</ns1:isiku_roll_tekstina>
                     <ns1:eesnimi>Mari</ns1:eesnimi>
                     <ns1:nimi_arinimi>Maasikas</ns1:nimi_arinimi>
                     <ns1:isikukood_registrikood>49001011234</ns1:isikukood_registrikood>
                     <ns1:algus_kpv>2019-05-14Z</ns1:algus_kpv>
                     <ns1:ainuesindus>true</ns1:ainuesindus>
                   </ns1:item>
                 </ns1:kaardile_kantud_isikud>
                 <ns1:kaardivalised_isikud>
                   <ns1:item>
                     <ns1:isiku_tyyp>J</ns1:isiku_tyyp>
                     <ns1:isiku_roll>OSAN</ns1:isiku_roll>
                     <ns1:nimi_arinimi>Holding OÜ</ns1:nimi_arinimi>
                     <ns1:isikukood_registrikood>87654321</ns1:isikukood_registrikood>
                   </ns1:item>
                 </ns1:kaardivalised_isikud>
               </ns1:isikuandmed>"#,
            "",
        );
        let details = normalize_company(&xml, today()).unwrap();
        assert_eq!(details.persons.len(), 2);
        let board = &details.persons[0];
        assert_eq!(board.display_name(), "Mari Maasikas");
        assert_eq!(board.role_code, "JUHL");
        assert!(board.sole_representation);
        assert_eq!(board.person_type, PersonType::Natural);
        assert_eq!(details.persons[1].person_type, PersonType::Legal);

        let signers = details.signing_representatives(today());
        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].name, "Maasikas");
    }

    #[test]
    fn representative_filter_keeps_signing_roles_only() {
        let base = Representative {
            person_type: PersonType::Natural,
            first_name: None,
            name: "X".into(),
            personal_code: None,
            role_code: "JUHL".into(),
            role_text: None,
            start_date: None,
            end_date: None,
            is_procurator: false,
            sole_representation: false,
        };
        let persons = vec![
            Representative { role_code: "JUHL".into(), ..base.clone() },
            Representative { role_code: "PROK".into(), ..base.clone() },
            Representative { role_code: "TOSAN".into(), ..base.clone() },
            Representative { role_code: "UOSAN".into(), ..base.clone() },
            Representative { role_code: "LIKV".into(), ..base.clone() },
            Representative { role_code: "OSAN".into(), ..base.clone() },
            Representative { role_code: "X".into(), is_procurator: true, ..base.clone() },
            Representative {
                end_date: NaiveDate::from_ymd_opt(2025, 1, 1),
                ..base.clone()
            },
            Representative { end_date: Some(today()), ..base.clone() },
        ];
        let kept = signing_representatives(&persons, today());
        assert_eq!(kept.len(), 7);
        assert!(kept.iter().all(|p| p.role_code != "OSAN"));
    }

    // ── Contacts ──

    #[test]
    fn contact_synonyms_resolve() {
        let xml = response(
            "",
            r#"<ns1:kontaktandmed>
                 <ns1:e_posti_aadress>info@naidis.ee</ns1:e_posti_aadress>
                 <ns1:mobiil>+372 5555 5555</ns1:mobiil>
                 <ns1:koduleht>naidis.ee</ns1:koduleht>
               </ns1:kontaktandmed>"#,
        );
        let details = normalize_company(&xml, today()).unwrap();
        assert_eq!(details.email.as_deref(), Some("info@naidis.ee"));
        assert_eq!(details.phone.as_deref(), Some("+372 5555 5555"));
        assert_eq!(details.website.as_deref(), Some("naidis.ee"));
    }

    #[test]
    fn valid_channel_overrides_expired_one() {
        let xml = response(
            "",
            r#"<ns1:sidevahendid>
                 <ns1:item>
                   <ns1:liik>EMAIL</ns1:liik>
                   <ns1:sisu>vana@naidis.ee</ns1:sisu>
                   <ns1:lopp_kpv>2020-01-01Z</ns1:lopp_kpv>
                 </ns1:item>
                 <ns1:item>
                   <ns1:liik>EMAIL</ns1:liik>
                   <ns1:sisu>uus@naidis.ee</ns1:sisu>
                 </ns1:item>
                 <ns1:item>
                   <ns1:liik>MOB</ns1:liik>
                   <ns1:sisu>+372 5111 1111</ns1:sisu>
                 </ns1:item>
                 <ns1:item>
                   <ns1:liik>MOB</ns1:liik>
                   <ns1:sisu>+372 5222 2222</ns1:sisu>
                   <ns1:lopp_kpv>2020-01-01Z</ns1:lopp_kpv>
                 </ns1:item>
                 <ns1:item>
                   <ns1:liik>WWW</ns1:liik>
                   <ns1:sisu>naidis.ee</ns1:sisu>
                 </ns1:item>
               </ns1:sidevahendid>"#,
        );
        let details = normalize_company(&xml, today()).unwrap();
        assert_eq!(details.email.as_deref(), Some("uus@naidis.ee"));
        // The expired phone comes later but does not replace a found one.
        assert_eq!(details.phone.as_deref(), Some("+372 5111 1111"));
        assert_eq!(details.website.as_deref(), Some("naidis.ee"));
    }

    #[test]
    fn company_element_is_last_resort_for_email_and_phone() {
        let xml = response(
            "<ns1:email>firma@naidis.ee</ns1:email>\
             <ns1:telefon>6123456</ns1:telefon>\
             <ns1:www>x.ee</ns1:www>",
            "",
        );
        let details = normalize_company(&xml, today()).unwrap();
        assert_eq!(details.email.as_deref(), Some("firma@naidis.ee"));
        assert_eq!(details.phone.as_deref(), Some("6123456"));
        assert_eq!(details.website, None);
    }

    #[test]
    fn active_statuses() {
        assert!(is_company_active("R"));
        assert!(is_company_active("Registrisse kantud"));
        assert!(is_company_active("Registered"));
        assert!(!is_company_active("L"));
        assert!(!is_company_active("Kustutatud"));
    }
}
