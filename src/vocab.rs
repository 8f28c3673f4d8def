//! Closed vocabularies used by accounts and transactions.
//!
//! Every vocabulary is a plain enum whose variants map one-to-one to the
//! literal spelling used in import files. Membership is tested with
//! [`Vocabulary::parse`]; matching is exact and case-sensitive.

use std::fmt;

/// A closed set of literals with an explicit membership test.
pub trait Vocabulary: Sized + Copy + 'static {
    /// All members, in declaration order.
    const ALL: &'static [Self];

    /// The literal spelling of this member.
    fn as_str(&self) -> &'static str;

    /// Looks up the member spelled exactly `raw`.
    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == raw)
    }

    /// Returns `true` if `raw` names a member.
    fn contains(raw: &str) -> bool {
        Self::parse(raw).is_some()
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl Vocabulary for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $literal),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use vocabulary;

vocabulary! {
    /// Direction of money through an account.
    pub enum AccountFlow {
        Income => "Income",
        Outgoing => "Outgoing",
    }
}

vocabulary! {
    pub enum AccountType {
        Revenues => "Revenues",
        Assets => "Assets",
        Expenses => "Expenses",
    }
}

vocabulary! {
    pub enum AccountSubType {
        Donation => "Donation",
        SalesRevenue => "Sales Revenue",
        OfficeEquipments => "Office Equipments",
        FixedAssets => "Fixed Assets",
        Supplies => "Supplies",
        MusicalEquipments => "Musical Equipments",
        SuppliesExpenses => "Supplies Expenses",
        RentExpenses => "Rent Expenses",
        UtilitiesExpense => "Utilities Expense",
        BankServices => "Bank Services",
        OtherExpenses => "Other Expenses",
        LocalMissionSupport => "Local Mission Support",
        ExternalServices => "External Services",
        SalariesExpenses => "Salaries Expenses",
        MediaProjects => "Media Projects",
    }
}

vocabulary! {
    /// Accounting category; doubles as the natural key of an account.
    pub enum TransactionCategory {
        OfrendaServicioRegular => "Ofrenda Servicio Regular",
        OfrendaMisionera => "Ofrenda Misionera",
        OfrendaEspecial => "Ofrenda Especial",
        OfrendaConFinEspecifico => "Ofrenda con fin específico",
        DiezmoRegular => "Diezmo Regular",
        DiezmoPastor => "Diezmo Pastor",
        CotizacionMiembro => "Cotizacion Miembro",
        ApoyoDesdeFondoNacional => "Apoyo desde Fondo Nacional",
        VentaDeComidas => "Venta de comidas",
        VentaDeArticulos => "Venta de artículos",
        ContribucionAdicionalDesdeIglesiaLocal => "Contribución adicional desde Iglesia Local",
        ContribucionDesdeFuenteExterna => "Contribución desde Fuente Externa",
        OtrosIngresos => "Otros Ingresos",
        CompraDeMobiliario => "Compra de mobiliario",
        CompraDeBienesInmuebles => "Compra de bienes inmuebles",
        CompraDeBienesMuebles => "Compra de bienes muebles (vehiculos, ...)",
        CompraDeMaterialesEscuelaDominicalInfantil => "Compra de materiales Escuela Dominical Infantil",
        CompraDeEquiposAudiovisuales => "Compra de equipos audiovisuales",
        CompraDeInstrumentosMusicales => "Compra de instrumentos musicales",
        CompraDeAlimentosEIngredientes => "Compra de alimentos e ingredientes",
        CompraDeProductosDeLimpieza => "Compra de productos de limpieza",
        CompraDeOtrosConsumibles => "Compra de otros consumibles",
        CompraDeOtrosNoConsumibles => "Compra de otros No consumibles",
        PagoDeAlquilerDeLocales => "Pago de alquiler de locales",
        PagoDeAlquilerDeMateriales => "Pago de alquiler de materiales",
        PagoDeHospedaje => "Pago de hospedaje",
        PagoDeTiquetesDeTransporte => "Pago de tiquetes de transporte",
        PagoDeEstacionamientoParking => "Pago de estacionamiento/parking",
        PagoDeCombustible => "Pago de combustible",
        PagoDeServiciosBasicos => "Pago de servicios básicos",
        PagoDeAlimentacion => "Pago de alimentación",
        PagoDeServiciosBancarios => "Pago de servicios bancarios",
        PagoDeOtrosServicios => "Pago de otros servicios",
        ContribucionAIglesiaLocal => "Contribución a Iglesia Local",
        ContribucionAFondoNacional => "Contribución a Fondo Nacional",
        ContribucionAMmmBloqueC => "Contribución a MMM Bloque C",
        ContribucionAMmmInternacional => "Contribución a MMM Internacional",
        AsignacionAPastorLocal => "Asignación a Pastor local",
        OfrendaAInvitado => "Ofrenda a invitado",
        ProyectosDeDifusion => "Proyectos de difusión",
        AyudaSocial => "Ayuda Social",
        OtrosEgresos => "Otros Egresos",
    }
}

vocabulary! {
    /// Organizational scope of an account.
    pub enum CostCenter {
        Any => "Any",
        Local => "Local",
        National => "National",
    }
}

vocabulary! {
    pub enum TransactionType {
        Income => "Income",
        Expense => "Expense",
    }
}

vocabulary! {
    pub enum TransactionCurrency {
        Eur => "EUR",
        Usd => "USD",
        Gbp => "GBP",
    }
}

vocabulary! {
    pub enum TransactionMethod {
        Cash => "Cash",
        Bank => "Bank",
        Card => "Card",
        Transfer => "Transfer",
    }
}
