//! # Payroll Simulator
//!
//! Reverse calculation from the net amount a person wants to receive to the
//! gross salary and the employer's total cost, using the Estonian tax rates
//! of the simulator page. Figures are approximate and rounded to whole euros.
//! This is not a payroll engine of record.
//!
//! ## Rates
//!
//! | Item | Rate | Base |
//! |---|---|---|
//! | Social tax | 33 % | max(gross, 725) |
//! | Funded pension | 2 % | gross |
//! | Unemployment insurance (worker) | 1.6 % | gross, employees only |
//! | Unemployment insurance (employer) | 0.8 % | gross, employees only |
//! | Income tax | 20 % | gross - pension - worker UI - 654, floored at 0 |

use serde::{Deserialize, Serialize};

use crate::error::KlaarError;

/// Monthly minimum base for social tax, in euros.
pub const MIN_SOCIAL_TAX_BASE: f64 = 725.0;
/// Monthly basic exemption deducted before income tax, in euros.
pub const BASIC_EXEMPTION: f64 = 654.0;

const SOCIAL_TAX_RATE: f64 = 0.33;
const PENSION_RATE: f64 = 0.02;
const UNEMPLOYMENT_WORKER_RATE: f64 = 0.016;
const UNEMPLOYMENT_EMPLOYER_RATE: f64 = 0.008;
const INCOME_TAX_RATE: f64 = 0.20;
const BOARD_MEMBER_NET_RATIO: f64 = 0.784;
const EMPLOYEE_NET_RATIO: f64 = 0.76;
const BOARD_MEMBER_SAVINGS_RATE: f64 = 0.024;

/// Contract under which the person is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Management board member contract. Not insured against unemployment.
    BoardMember,
    /// Regular employment contract.
    Employee,
}

impl ContractType {
    /// Estonian contract title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::BoardMember => "JUHATUSE LIIKME LEPING",
            Self::Employee => "TÖÖLEPING",
        }
    }

    fn net_ratio(&self) -> f64 {
        match self {
            Self::BoardMember => BOARD_MEMBER_NET_RATIO,
            Self::Employee => EMPLOYEE_NET_RATIO,
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BoardMember => "board_member",
            Self::Employee => "employee",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ContractType {
    type Err = KlaarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "board_member" | "board-member" => Ok(Self::BoardMember),
            "employee" => Ok(Self::Employee),
            other => Err(KlaarError::Payroll(format!(
                "unknown contract type \"{other}\""
            ))),
        }
    }
}

/// Result of a payroll simulation, all amounts in whole euros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    pub contract_type: ContractType,
    pub net: i64,
    pub gross: i64,
    pub total_cost: i64,
    pub social_tax: i64,
    pub income_tax: i64,
    pub pension: i64,
    pub unemployment_worker: i64,
    pub unemployment_employer: i64,
    /// Whether social tax paid entitles the person to health insurance.
    pub has_health_insurance: bool,
    /// Saving compared to an employment contract. Zero for employees.
    pub savings_from_optimization: i64,
}

impl PayrollBreakdown {
    /// Simulate payroll for a target monthly net amount.
    ///
    /// # Errors
    ///
    /// Returns [`KlaarError::Payroll`] if `target_net` is not a positive,
    /// finite number.
    pub fn simulate(contract_type: ContractType, target_net: f64) -> Result<Self, KlaarError> {
        if !target_net.is_finite() || target_net <= 0.0 {
            return Err(KlaarError::Payroll(format!(
                "target net must be a positive amount, got {target_net}"
            )));
        }

        let gross = target_net / contract_type.net_ratio();
        let is_employee = contract_type == ContractType::Employee;

        let social_tax = gross.max(MIN_SOCIAL_TAX_BASE) * SOCIAL_TAX_RATE;
        let pension = gross * PENSION_RATE;
        let (unemployment_worker, unemployment_employer) = if is_employee {
            (
                gross * UNEMPLOYMENT_WORKER_RATE,
                gross * UNEMPLOYMENT_EMPLOYER_RATE,
            )
        } else {
            (0.0, 0.0)
        };
        let income_tax =
            ((gross - pension - unemployment_worker - BASIC_EXEMPTION) * INCOME_TAX_RATE).max(0.0);
        let total_cost = gross + social_tax + unemployment_employer;
        let savings = match contract_type {
            ContractType::BoardMember => gross * BOARD_MEMBER_SAVINGS_RATE,
            ContractType::Employee => 0.0,
        };

        Ok(Self {
            contract_type,
            net: euros(target_net),
            gross: euros(gross),
            total_cost: euros(total_cost),
            social_tax: euros(social_tax),
            income_tax: euros(income_tax),
            pension: euros(pension),
            unemployment_worker: euros(unemployment_worker),
            unemployment_employer: euros(unemployment_employer),
            has_health_insurance: gross >= MIN_SOCIAL_TAX_BASE,
            savings_from_optimization: euros(savings),
        })
    }
}

fn euros(amount: f64) -> i64 {
    amount.round() as i64
}
