//! # Service Contract
//!
//! The accounting-service agreement a new client signs during onboarding.
//!
//! [`contract_text`] renders the full Estonian agreement from the company
//! name, registry code and contract date. The text is deterministic for the
//! same inputs, which matters because the signature provider receives both
//! the base64 body and the SHA-256 digest of exactly these bytes.
//!
//! [`employment_contract_text`] drafts the board-member or employment
//! agreement that goes with a payroll simulation.
//!
//! A [`ServiceContract`] is created in `Pending` status when a signing
//! workflow starts and is only mutated on successful signing.

use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use klaar_core::temporal::estonian_date;
use klaar_core::{ContentDigest, ContractId, ContractType, PersonalCode, RegistryCode, Timestamp};

/// Legal name of the service provider as printed in the agreement.
pub const PROVIDER_NAME: &str = "KLAARIKS OÜ";

const CONTRACT_TERMS: [&str; 5] = [
    "Igakuine raamatupidamisteenus",
    "Maksudeklaratsioonide esitamine",
    "Majandusaasta aruande koostamine",
    "Lepingu tähtaeg: tähtajatu",
    "Ülesütlemise etteteatamine: 30 päeva",
];

/// Short summary of the agreement's key terms, shown before signing.
pub fn contract_terms() -> &'static [&'static str] {
    &CONTRACT_TERMS
}

/// Render the full accounting-service agreement.
pub fn contract_text(company_name: &str, reg_code: &str, date: NaiveDate) -> String {
    let date = estonian_date(date);
    format!(
        "RAAMATUPIDAMISTEENUSE LEPING

Käesolev leping on sõlmitud {date}

1. LEPINGU POOLED

1.1 Teenuse osutaja: {PROVIDER_NAME} (edaspidi \"Teenusepakkuja\")
1.2 Klient: {company_name}, registrikood {reg_code} (edaspidi \"Klient\")

2. TEENUSE SISU

2.1 Teenusepakkuja osutab Kliendile järgmisi raamatupidamisteenuseid:
   - Igapäevane raamatupidamine
   - Maksudeklaratsioonide koostamine ja esitamine (TSD, KMD)
   - Majandusaasta aruande koostamine
   - Konsultatsioon raamatupidamise küsimustes

3. TEENUSE HIND

3.1 Teenuse kuutasu lepitakse kokku eraldi hinnakirja alusel.
3.2 Arve esitatakse iga kuu 5. kuupäevaks eelmise kuu eest.

4. KONFIDENTSIAALSUS

4.1 Teenusepakkuja kohustub hoidma konfidentsiaalsena kogu Kliendi
    äritegevust puudutava informatsiooni.

5. LEPINGU KEHTIVUS

5.1 Leping jõustub allkirjastamise hetkest.
5.2 Leping on sõlmitud tähtajatult.
5.3 Kumbki pool võib lepingu lõpetada 30-päevase etteteatamisega.

6. LÕPPSÄTTED

6.1 Leping on koostatud ja allkirjastatud digitaalselt.
6.2 Lepingule kohaldatakse Eesti Vabariigi õigust.

---
Allkirjastatud digitaalselt
"
    )
}

/// Render a draft employment agreement for a payroll simulation.
///
/// `gross` is the monthly gross salary in whole euros, as computed by
/// [`klaar_core::PayrollBreakdown::simulate`]. Employer and personal-code
/// lines are placeholders to be filled in before signing.
pub fn employment_contract_text(
    contract_type: ContractType,
    employee_name: &str,
    gross: i64,
    date: NaiveDate,
) -> String {
    let title = contract_type.title();
    let date = estonian_date(date);
    let (party, role) = match contract_type {
        ContractType::BoardMember => (
            "Juhatuse liige",
            "Juhatuse liige asub täitma ettevõtte juhtimisülesandeid vastavalt Äriseadustikule.",
        ),
        ContractType::Employee => ("Töötaja", "Töötaja asub tööle spetsialisti ametikohale."),
    };
    format!(
        "{title}

Sõlmitud: {date}

1. LEPINGU POOLED
1.1. Ettevõte: Teie Ettevõte OÜ (registrikood 12345678), asukoht Tallinn.
1.2. {party}: {employee_name} (isikukood 3900101xxxx).

2. LEPINGU EESMÄRK
2.1. {role}
2.2. Lepinguga tagatakse isikule sotsiaalsed garantiid (s.h ravikindlustus).

3. TASU
3.1. Tasu suuruseks on {gross} eurot (bruto) kuus.
3.2. Tasu makstakse välja järgneva kuu 5. kuupäeval.

4. KEHTIVUS
4.1. Leping on tähtajatu.

5. LÕPPSÄTTED
5.1. Käesolev leping on sõlmitud digitaalselt.
"
    )
}

// ─── Contract ────────────────────────────────────────────────────────

/// Lifecycle status of a service contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Pending,
    Signing,
    Signed,
    Error,
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Signing => "signing",
            Self::Signed => "signed",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// An accounting-service contract between the provider and a client company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContract {
    pub id: ContractId,
    pub company_name: String,
    pub company_reg_code: RegistryCode,
    pub created_at: Timestamp,
    pub signer_name: Option<String>,
    pub signer_id_code: Option<PersonalCode>,
    pub signed_at: Option<Timestamp>,
    pub status: ContractStatus,
    /// Base64 signed container returned by the provider.
    pub signed_file_content: Option<String>,
}

impl ServiceContract {
    /// Create a pending contract dated now.
    pub fn new(company_name: impl Into<String>, company_reg_code: RegistryCode) -> Self {
        Self::created_at(company_name, company_reg_code, Timestamp::now())
    }

    /// Create a pending contract with an explicit creation time.
    pub fn created_at(
        company_name: impl Into<String>,
        company_reg_code: RegistryCode,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: ContractId::new(),
            company_name: company_name.into(),
            company_reg_code,
            created_at,
            signer_name: None,
            signer_id_code: None,
            signed_at: None,
            status: ContractStatus::Pending,
            signed_file_content: None,
        }
    }

    /// File name of the document inside the signing container.
    pub fn file_name(&self) -> String {
        format!("leping_{}.txt", self.company_reg_code)
    }

    /// Full agreement text, dated on the contract's creation day.
    pub fn text(&self) -> String {
        contract_text(
            &self.company_name,
            self.company_reg_code.as_str(),
            self.created_at.date(),
        )
    }

    /// Bundle the agreement for submission to a signature provider.
    pub fn document(&self) -> ContractDocument {
        let text = self.text();
        ContractDocument {
            file_name: self.file_name(),
            content_base64: general_purpose::STANDARD.encode(text.as_bytes()),
            digest: ContentDigest::of_text(&text),
            text,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.status == ContractStatus::Signed
    }

    pub(crate) fn mark_signed(
        &mut self,
        signer_name: Option<String>,
        signer_id_code: PersonalCode,
        signed_file_content: String,
        signed_at: Timestamp,
    ) {
        self.signer_name = signer_name;
        self.signer_id_code = Some(signer_id_code);
        self.signed_file_content = Some(signed_file_content);
        self.signed_at = Some(signed_at);
        self.status = ContractStatus::Signed;
    }
}

/// The agreement as a file ready to be placed in a signing container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDocument {
    pub file_name: String,
    pub text: String,
    /// Base64 of the UTF-8 text.
    pub content_base64: String,
    /// SHA-256 of the UTF-8 text.
    pub digest: ContentDigest,
}
