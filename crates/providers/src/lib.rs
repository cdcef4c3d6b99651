pub mod restcountries;
