//! MADS/RDF vocabulary terms.
//!
//! A fixed table of the Metadata Authority Description Schema property and
//! class names, used to build IRIs. No RDF graph handling lives here.

/// MADS/RDF namespace.
pub const MADSRDF: &str = "http://www.loc.gov/mads/rdf/v1#";

/// Property local names.
pub const PROPERTIES: &[&str] = &[
    "adminMetadata",
    "affiliationEnd",
    "affiliationStart",
    "authoritativeLabel",
    "changeNote",
    "citationNote",
    "citationSource",
    "citationStatus",
    "city",
    "classification",
    "code",
    "componentList",
    "country",
    "definitionNote",
    "deletionNote",
    "deprecatedLabel",
    "editorialNote",
    "elementList",
    "elementValue",
    "email",
    "exampleNote",
    "extendedAddress",
    "fax",
    "fieldOfActivity",
    "hasAffiliation",
    "hasBroaderAuthority",
    "hasCloseExternalMatch",
    "hasExactExternalMatch",
    "hasNarrowerAuthority",
    "hasReciprocalAuthority",
    "hasRelatedAuthority",
    "hasSource",
    "hasVariant",
    "historyNote",
    "hours",
    "identifiesRWO",
    "isMemberOfMADSCollection",
    "isMemberOfMADSScheme",
    "note",
    "organization",
    "phone",
    "postcode",
    "scopeNote",
    "state",
    "streetAddress",
    "variantLabel",
];

/// Class local names.
pub const CLASSES: &[&str] = &[
    "Address",
    "Affiliation",
    "Area",
    "Authority",
    "City",
    "CitySection",
    "ComplexSubject",
    "ConferenceName",
    "Continent",
    "CorporateName",
    "Country",
    "County",
    "DateNameElement",
    "DeprecatedAuthority",
    "ExtraterrestrialArea",
    "FamilyName",
    "FamilyNameElement",
    "FullNameElement",
    "GenreForm",
    "Geographic",
    "GivenNameElement",
    "HierarchicalGeographic",
    "Island",
    "Language",
    "MADSCollection",
    "MADSScheme",
    "Name",
    "NameTitle",
    "Occupation",
    "PersonalName",
    "Province",
    "Region",
    "State",
    "Temporal",
    "TermsOfAddressNameElement",
    "Territory",
    "Title",
    "Topic",
    "Variant",
];

pub fn is_property(name: &str) -> bool {
    PROPERTIES.contains(&name)
}

pub fn is_class(name: &str) -> bool {
    CLASSES.contains(&name)
}

/// Full IRI for a vocabulary term, or `None` if `name` is not in the table.
///
/// Names are case-sensitive: `city` is a property, `City` a class.
pub fn iri(name: &str) -> Option<String> {
    (is_property(name) || is_class(name)).then(|| format!("{MADSRDF}{name}"))
}
