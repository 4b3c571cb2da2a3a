fn main() -> anyhow::Result<()> {
    clinic_finance_lib::run()
}
