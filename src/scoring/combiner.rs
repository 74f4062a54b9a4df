//! Inherent x specific combination matrix.
//!
//! Rows are the inherent (client) band, columns the specific (operation) band.
//! The matrix is data, not a formula: it need not be symmetric, and a cell is
//! returned exactly as configured.

use crate::domain::RiskBand::{self, High, Low, Medium};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinationMatrix {
    cells: [[RiskBand; 3]; 3],
}

impl CombinationMatrix {
    /// Default methodology: specific risk weighs more than inherent risk, so a
    /// high specific band lifts a low client to HIGH while a high client with a
    /// low-risk operation stays at MEDIUM.
    pub const DEFAULT: CombinationMatrix = CombinationMatrix {
        cells: [
            [Low, Medium, High],
            [Low, Medium, High],
            [Medium, High, High],
        ],
    };

    pub const fn new(cells: [[RiskBand; 3]; 3]) -> Self {
        Self { cells }
    }

    /// Build from configured rows (LOW, MEDIUM, HIGH order on both axes).
    pub fn from_rows(rows: &[Vec<RiskBand>]) -> Result<Self, ConfigError> {
        if rows.len() > 3 {
            return Err(ConfigError::MatrixRowCount { found: rows.len() });
        }
        let mut cells = [[Low; 3]; 3];
        for inherent in RiskBand::ALL {
            let i = inherent.index();
            let row = rows.get(i);
            if let Some(row) = row {
                if row.len() > 3 {
                    return Err(ConfigError::MatrixRowLength { row: i, found: row.len() });
                }
            }
            for specific in RiskBand::ALL {
                let j = specific.index();
                cells[i][j] = row
                    .and_then(|r| r.get(j))
                    .copied()
                    .ok_or(ConfigError::MissingMatrixCell { inherent, specific })?;
            }
        }
        Ok(Self { cells })
    }

    pub fn rows(&self) -> Vec<Vec<RiskBand>> {
        self.cells.iter().map(|r| r.to_vec()).collect()
    }

    pub fn combine(&self, inherent: RiskBand, specific: RiskBand) -> RiskBand {
        self.cells[inherent.index()][specific.index()]
    }
}

impl Default for CombinationMatrix {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Overall band for an (inherent, specific) pair.
pub fn combine(matrix: &CombinationMatrix, inherent: RiskBand, specific: RiskBand) -> RiskBand {
    matrix.combine(inherent, specific)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matrix_is_asymmetric() {
        let m = CombinationMatrix::DEFAULT;
        assert_eq!(combine(&m, Low, Low), Low);
        assert_eq!(combine(&m, Low, High), High);
        assert_eq!(combine(&m, High, Low), Medium);
        assert_ne!(combine(&m, Low, High), combine(&m, High, Low));
    }

    #[test]
    fn every_cell_is_returned_as_configured() {
        let rows = vec![
            vec![High, Low, Medium],
            vec![Medium, High, Low],
            vec![Low, Medium, High],
        ];
        let m = CombinationMatrix::from_rows(&rows).unwrap();
        for inherent in RiskBand::ALL {
            for specific in RiskBand::ALL {
                assert_eq!(m.combine(inherent, specific), rows[inherent.index()][specific.index()]);
            }
        }
        assert_eq!(m.rows(), rows);
    }

    #[test]
    fn missing_cell_is_a_config_error() {
        let rows = vec![vec![Low, Medium, High], vec![Low, Medium]];
        let err = CombinationMatrix::from_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingMatrixCell {
                inherent: Medium,
                specific: High
            }
        );
    }

    #[test]
    fn oversized_matrix_is_rejected() {
        let rows = vec![vec![Low, Low, Low, Low], vec![Low; 3], vec![Low; 3]];
        assert!(matches!(
            CombinationMatrix::from_rows(&rows),
            Err(ConfigError::MatrixRowLength { row: 0, found: 4 })
        ));
        let rows = vec![vec![Low; 3]; 4];
        assert!(matches!(
            CombinationMatrix::from_rows(&rows),
            Err(ConfigError::MatrixRowCount { found: 4 })
        ));
    }
}
